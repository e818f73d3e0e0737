//! The start page: the bootstrap document every client loads first.

use std::fmt::Write as _;

use crate::app::params::AppParams;
use crate::session::ROOT_ELEMENT_ID;
use crate::view::escape_html;

/// Script that connects to the server and runs the bridge protocol.
pub const SCRIPT_PATH: &str = "/rui.js";

/// Page-level styles the views rely on before the theme arrives.
pub const BASE_CSS: &str = r#"* {
  box-sizing: border-box;
}
html, body {
  margin: 0;
  padding: 0;
  width: 100%;
  height: 100%;
  overflow: hidden;
}
.ruiRoot {
  position: absolute;
  top: 0px;
  bottom: 0px;
  left: 0px;
  right: 0px;
}
.ruiPopupLayer {
  position: absolute;
  top: 0px;
  bottom: 0px;
  left: 0px;
  right: 0px;
  visibility: hidden;
}
.ruiTooltipLayer {
  position: absolute;
  top: 0px;
  bottom: 0px;
  left: 0px;
  right: 0px;
  visibility: hidden;
  pointer-events: none;
}
.ruiTooltip {
  position: absolute;
  padding: 4px 8px;
  border-radius: 4px;
}
.ruiListItem, .ruiListItemSelected {
  cursor: pointer;
}
"#;

/// The start page for `params`.
pub fn start_page(params: &AppParams) -> String {
    let mut page = String::with_capacity(2048);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", escape_html(&params.title));
    if let Some(color) = params.title_color {
        let _ = writeln!(page, "<meta name=\"theme-color\" content=\"{}\">", color.css_string());
    }
    if let Some(icon) = &params.icon {
        let _ = writeln!(page, "<link rel=\"icon\" href=\"{}\">", escape_html(icon));
    }
    page.push_str("<base target=\"_blank\" rel=\"noopener\">\n");
    page.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, user-scalable=no\">\n",
    );
    let _ = writeln!(page, "<style>\n{BASE_CSS}</style>");
    page.push_str("<style id=\"ruiCSS\"></style>\n<style id=\"ruiAnimations\"></style>\n");
    let _ = writeln!(
        page,
        "<script>var ruiUseSocket = {};</script>",
        !params.no_socket
    );
    let _ = writeln!(page, "<script src=\"{SCRIPT_PATH}\"></script>");
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<div class=\"ruiRoot\" id=\"{ROOT_ELEMENT_ID}\"></div>");
    page.push_str("<div class=\"ruiPopupLayer\" id=\"ruiPopupLayer\" onclick=\"popupLayerClick(event)\"></div>\n");
    page.push_str(
        "<div class=\"ruiTooltipLayer\" id=\"ruiTooltipLayer\">\
         <div class=\"ruiTooltip\" id=\"ruiTooltipText\"></div>\
         <div class=\"ruiTooltipArrow\" id=\"ruiTooltipArrow\"></div></div>\n",
    );
    page.push_str("<a id=\"ruiDownloader\" download style=\"display: none;\"></a>\n");
    page.push_str("</body>\n</html>\n");
    page
}
