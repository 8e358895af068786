use axum::response::Html;

use crate::{types::UserId, utils};

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = utils::escape_html(title),
        body = body
    ))
}

/// Landing page with the login link.
pub async fn home() -> Html<String> {
    layout(
        "coverfetch",
        "<h1>Album cover downloader</h1>\n\
         <p>Sign in with Spotify to download the cover art of every album in your library.</p>\n\
         <p><a href=\"/login\">Log in with Spotify</a></p>\n\
         <p><a href=\"/privacy-policy\">Privacy policy</a></p>",
    )
}

/// Static privacy policy.
pub async fn privacy_policy() -> Html<String> {
    layout(
        "Privacy policy",
        "<h1>Privacy policy</h1>\n\
         <p>coverfetch reads the list of albums saved in your Spotify library \
         and downloads their cover images. Access tokens are kept in server memory \
         for the duration of your session only and are revoked when you disconnect.</p>\n\
         <p>Downloaded cover images are stored on this server so they can be offered \
         for download.</p>\n\
         <p><a href=\"/\">Back</a></p>",
    )
}

/// Listing of the covers available in the caller's folder.
pub fn download_page(files: &[String], user: Option<&UserId>) -> Html<String> {
    let mut body = String::from("<h1>Your album covers</h1>\n");

    if let Some(user) = user {
        body.push_str(&format!(
            "<p>Signed in as {}</p>\n",
            utils::escape_html(user.as_str())
        ));
    }

    if files.is_empty() {
        body.push_str("<p>No covers downloaded yet.</p>\n");
    } else {
        body.push_str(&format!("<p>{} covers</p>\n<ul>\n", files.len()));
        for file in files {
            body.push_str(&format!(
                "<li><a href=\"/download/{href}\">{name}</a></li>\n",
                href = utils::encode_path_segment(file),
                name = utils::escape_html(file)
            ));
        }
        body.push_str("</ul>\n");
        body.push_str("<p><a href=\"/download_all\">Download all as zip</a></p>\n");
    }

    body.push_str("<p><a href=\"/disconnect\">Disconnect</a></p>");
    layout("Album covers", &body)
}
