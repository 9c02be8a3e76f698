//! Hover and popup helpers for lesson pages

use crate::config::PopupConfig;
use crate::markdown::escape_html;

/// Two previews sharing one spot: a live frame and a static image
pub trait PreviewPanel {
    fn set_live_visible(&self, visible: bool);
    fn set_static_visible(&self, visible: bool);
}

/// Swap the static preview for the live one while the pointer is over it
pub fn preview_hover<P: PreviewPanel>(panel: &P, hovering: bool) {
    panel.set_live_visible(hovering);
    panel.set_static_visible(!hovering);
}

/// Page coordinates of an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

/// A reference image ready to be placed next to its trigger
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePopup {
    pub html: String,
    pub position: Offset,
}

/// Build the image popup for a `.hover-trigger` at `anchor`
pub fn reference_image(config: &PopupConfig, image_src: &str, anchor: Offset) -> ImagePopup {
    let html = format!(
        r#"<img src="{}" style="width: {}px;" alt="Popup Image">"#,
        escape_html(image_src),
        config.image_width_px
    );
    ImagePopup {
        html,
        position: Offset {
            top: anchor.top + config.image_offset_top,
            left: anchor.left + config.image_offset_left,
        },
    }
}
