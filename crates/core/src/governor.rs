use serde::{Deserialize, Serialize};

use crate::domain::menu::Menu;

/// Default maximum body size accepted by the SMS reply channel.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1600;

/// Characters held back from the limit when hard-truncating a reply.
pub const TRUNCATION_HEADROOM: usize = 100;

pub const TRUNCATION_MARKER: &str = " ...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rendering {
    Full,
    Simplified,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMenu {
    pub rendering: Rendering,
    pub text: String,
}

/// Message length as the reply channel counts it, in characters.
pub fn message_len(message: &str) -> usize {
    message.chars().count()
}

pub fn is_too_large(message: &str, max_message_size: usize) -> bool {
    message_len(message) > max_message_size
}

/// Picks the bulleted rendering, or the single-line form when the bulleted
/// one would exceed the limit. The simplified text is returned as-is even if
/// it is still too long; [`cap_reply`] handles that at the boundary.
pub fn render_menu(menu: &Menu, max_message_size: usize) -> RenderedMenu {
    let full = menu.to_string();
    if is_too_large(&full, max_message_size) {
        RenderedMenu { rendering: Rendering::Simplified, text: menu.simplified() }
    } else {
        RenderedMenu { rendering: Rendering::Full, text: full }
    }
}

/// Last-resort truncation of the outbound text. Keeps the first
/// `max_message_size - 100` characters, trims trailing whitespace and appends
/// `" ..."`. Text within the limit is returned unchanged.
pub fn cap_reply(message: &str, max_message_size: usize) -> String {
    if !is_too_large(message, max_message_size) {
        return message.to_string();
    }

    let keep = max_message_size.saturating_sub(TRUNCATION_HEADROOM);
    let head = match message.char_indices().nth(keep) {
        Some((byte_index, _)) => &message[..byte_index],
        None => message,
    };
    format!("{}{TRUNCATION_MARKER}", head.trim_end())
}
