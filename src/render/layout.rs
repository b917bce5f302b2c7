//! Email layout templates.
//!
//! Campaign platforms render mail through table layouts with inline styles,
//! so every block here is a fixed nested-table fragment with holes for the
//! content. Interpolated text and attribute values are escaped by the
//! helpers; `content` parameters are trusted HTML.

use crate::config::Theme;
use crate::date::RunDate;
use crate::dom::{escape_attr, escape_text};

const BLOCK_STYLE: &str = "padding-left:24px;padding-right:24px;padding-top:12px;padding-bottom:12px";
const BANNER_STYLE: &str = "padding: 0px 24px 12px 24px";
const BUTTON_FONT: &str = "font-family:'Helvetica Neue', Helvetica, Arial, Verdana, sans-serif;font-size:16px;font-weight:normal;font-style:normal;padding:16px 28px;text-decoration:none;text-align:center;direction:ltr;letter-spacing:0px";

pub const NEWSLETTER_OPEN: &str =
    r#"<table class="newsletter" margin=0 cellpadding=0 cellspacing=0 style="border-collapse:collapse"><tbody><tr><td>"#;
pub const NEWSLETTER_CLOSE: &str = "</td></tr></tbody></table>";

const RESET_STYLES: &str = r#"<base href=""><style>.tpl-content { padding: 0 !important } table { border-collapse: collapse !important } table.newsletter { border-collapse: collapse} .mceStandardButton a, table.sign-up a { text-decoration: none }</style>"#;

pub const INTRO_CLOSE: &str = "</td></tr></tbody></table>";
pub const COMMUNITY_CLOSE: &str = "</td></tr></tbody></table>";

/// A full-width text block on a colored background.
pub fn block(content: &str, background: &str, style: Option<&str>) -> String {
    let style = style.unwrap_or(BLOCK_STYLE);
    format!(
        r#"<table border="0" cellpadding="0" cellspacing="0" width="100%" style="border-collapse:collapse" role="presentation"><tbody><tr><td style= "padding-top:0;padding-bottom:0;padding-right:0;padding-left:0;border:0;border-radius:0" valign="top"><table width="100%" style= "border:0;background-color:{background};border-radius:0"><tbody><tr><td style="{style}" class="mceTextBlockContainer"><div data-block-id="738" class="mceText" style= "width:100%">{content}</div></td></tr></tbody></table></td></tr></tbody></table>"#
    )
}

/// The delivery date on the dark banner.
pub fn date_banner(run_date: &RunDate, theme: &Theme) -> String {
    let color = &theme.banner_text;
    let date = escape_text(&run_date.banner());
    let content = format!(
        r#"<table style="margin: auto"><tbody><tr><td style="text-align: center; color: {color}"><div style="text-align: center; color: {color}">{date}</div></td></tr></tbody></table>"#
    );
    block(&content, &theme.banner_background, Some(BANNER_STYLE))
}

/// Reset styles and the opening of the intro table with its first paragraph.
pub fn intro_open(theme: &Theme) -> String {
    format!(
        r#"{RESET_STYLES}<table><tbody><tr><td style="padding: 12px 24px 12px 24px"><p>{}</p>"#,
        escape_text(&theme.intro)
    )
}

/// A black call-to-action button.
pub fn cta_button(href: &str, label: &str) -> String {
    let href = escape_attr(href);
    let label = escape_text(label);
    format!(
        r#"<table style="margin: auto"><tbody><tr><td style="padding: 12px 0 12px 0"><div style="margin-top: 12px"><table align="center" border="0" cellpadding="0" cellspacing="0" role="presentation" class="mceButtonContainer" style="padding-top: 24px; margin: auto; margin-top: 12px; text-align: center"><tbody><tr class="mceStandardButton"><td style="background-color:#000000;border-radius:0;margin-top:12px;text-align:center" valign="top" class="mceButton"><a href="{href}" target="_blank" class="mceButtonLink" style="background-color:#000000;border-radius:0;border:2px solid #000000;color:#ffffff;display:block;{BUTTON_FONT}" rel="noreferrer">{label}</a></td></tr></tbody></table></div></td></tr></tbody></table>"#
    )
}

/// Signup button for the current week and a link for the week after.
pub fn signup_block(run_date: &RunDate, theme: &Theme) -> String {
    let weeks = run_date.signup_weeks();
    let base = escape_attr(&theme.signup_url);
    let accent = &theme.accent_background;
    let link = &theme.secondary_link;
    let current_iso = weeks.current.start_iso();
    let next_iso = weeks.next.start_iso();
    let current_range = weeks.current.range_label().to_uppercase();
    let next_range = weeks.next.range_label();
    format!(
        r#"<table class="sign-up" style="background-color: {accent}; text-align: center; margin: auto; margin-top: 24px; margin-bottom: 12px;"><tbody><tr><td><a href="{base}?current_week={current_iso}" target="_blank" class="sign-up mceButtonLink" style="background-color:{accent};border-radius:0;border:2px solid {accent};color:#ffffff;display:block;{BUTTON_FONT}" rel="noreferrer">SIGN UP NOW TO DELIVER {current_range}</a></td></tr></table>
<p style="text-align: center; font-family: 'Helvetica Neue', Helvetica, Arial, Verdana"><a href="{base}?current_week={next_iso}" style="color: {link}; margin-top: 12px; margin-bottom: 12px;" target="_blank">You can also sign up early to deliver {next_range}</a></p>"#
    )
}

/// Full-width row holding a section's extra image.
pub fn extra_image_row(src: &str, alt: &str) -> String {
    format!(
        r#"<tr><td colspan="2" style="padding-top: 12px"><img src="{}" alt="{}" style="width: 100%; max-width: 100%"></td></tr>"#,
        escape_attr(src),
        escape_attr(alt)
    )
}

/// A section's main image, linked to the call to action when there is one.
pub fn main_image(src: &str, alt: &str, call_to_action: Option<&str>) -> String {
    let src = escape_attr(src);
    let alt = escape_attr(alt);
    match call_to_action {
        Some(href) => format!(
            r#"<a href="{}" tabindex="-1" style="display: block;"><span style="background-color: transparent"><img src="{src}" alt="{alt}" style="padding-top: 12px; display:block;max-width:100%;height:auto;border-radius:0" width="306" height="auto" class="imageDropZone mceImage"></span></a>"#,
            escape_attr(href)
        ),
        None => format!(
            r#"<img src="{src}" alt="{alt}" style="display:block; padding-top: 12px; width:100%; max-width:100%;height:auto;border-radius:0" width="306" height="auto" class="imageDropZone mceImage">"#
        ),
    }
}

/// Two columns: image on the left, text on the right, then the optional
/// extra-image row.
pub fn story_with_image(image: &str, content: &str, extra_row: &str) -> String {
    format!(
        r#"<table width="100%" border="0" cellspacing="0" cellpadding="0" align="center" style="margin-top: 12px; margin-bottom: 12px;"><tbody><tr class="mceRow"><td colspan="1" rowspan="1" style="background-position:center;background-repeat:no-repeat;background-size:cover" valign="top"><table width="100%" border="0" cellspacing="0" cellpadding="0"><tbody><tr><td colspan="12" rowspan="1" valign="top" width="100%" class="mceColumn"><table width="100%" border="0" cellspacing="0" cellpadding="0"><tbody><tr><td colspan="1" rowspan="1" style="border:0;border-radius:0" valign="top"><table width="100%" border="0" cellspacing="0" cellpadding="0" align="center"><tbody><tr class="mceRow"><td colspan="1" rowspan="1" style="background-position:center;background-repeat:no-repeat;background-size:cover;padding-top:0px;padding-bottom:0px" valign="top"><table style="table-layout:fixed" width="100%" border="0" cellspacing="24" cellpadding="0"><tbody><tr><td colspan="6" rowspan="1" style="padding-top:0;padding-bottom:0" valign="top" width="50%" class="mceColumn"><table width="100%" border="0" cellspacing="0" cellpadding="0"><tbody><tr><td colspan="1" rowspan="1" style="background-color:transparent;border:0;border-radius:0" valign="top" class="mceImageBlockContainer"><table style="border-collapse:separate;margin:0;vertical-align:top;max-width:100%;width:100%;height:auto" width="100%" border="0" cellspacing="0" cellpadding="0" align="center"><tbody><tr><td colspan="1" rowspan="1" style="border:0;border-radius:0;margin:0" valign="top">{image}</td></tr></tbody></table></td></tr></tbody></table></td><td colspan="6" rowspan="1" style="padding-top:0;padding-bottom:0" valign="top" width="50%" class="mceColumn"><table width="100%" border="0" cellspacing="0" cellpadding="0"><tbody><tr><td colspan="1" rowspan="1" style="padding:12px" valign="top" class="mceGutterContainer"><table style="border-collapse:separate" width="100%" border="0" cellspacing="0" cellpadding="0"><tbody><tr><td colspan="1" rowspan="1" style="padding-top:0;padding-bottom:0;padding-right:0;padding-left:0;border:0;border-radius:0" valign="top"><table style="border:0;background-color:transparent;border-radius:0;border-collapse:separate" width="100%"><tbody><tr><td colspan="1" rowspan="1" class="mceTextBlockContainer">{content}</td></tr></tbody></table></td></tr></tbody></table></td></tr></tbody></table></td></tr></tbody></table></td></tr></tbody></table></td></tr></tbody></table></td></tr></tbody></table></td></tr>{extra_row}</tbody></table>"#
    )
}

/// Single column of text, then the optional extra-image row.
pub fn story_text_only(content: &str, extra_row: &str) -> String {
    format!(
        r#"<table width="100%" border="0" cellspacing="0" cellpadding="0" align="center" style="margin-top: 12px; margin-bottom: 12px;"><tbody><tr><td colspan="2" style="padding-top: 12px">{content}</td></tr>{extra_row}</tbody></table>"#
    )
}

/// Opening of the themed community section, including its header block.
pub fn community_open(title: &str, theme: &Theme) -> String {
    let accent = &theme.accent_background;
    let header = format!(
        r#"<h1 style="text-align: center;"><span style= "color:#ffffff;">{}</span></h1>"#,
        escape_text(title)
    );
    format!(
        r#"<table style="background-color:{accent};"><tbody><tr><td style="padding-left: 24px; padding-right: 24px">{}"#,
        block(&header, accent, None)
    )
}

/// The closing list of short updates.
pub fn other_updates(title: &str, items: &str) -> String {
    format!(
        r#"<table><tbody><tr><td style="padding: 12px 24px 12px 24px"><h2>{}</h2><ul>{items}</ul></td></tr></tbody></table>"#,
        escape_text(title)
    )
}
