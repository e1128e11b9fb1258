//! Input/action surface: thin wrappers over
//! `Input.dispatch{Mouse,Key,Touch}Event`. Kept distinct from the
//! low-level CDP `Input.*` command structs in `cdp_types`, which callers
//! may still reach for directly via `Connection::call` for anything this
//! surface doesn't cover.

use crate::cdp_types::{DispatchKeyEventParams, DispatchMouseEventParams, DispatchTouchEventParams, TouchPoint};
use crate::connection::Connection;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    fn as_wire(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

/// Input/action surface bound to one connection; carries no state beyond
/// the borrowed connection.
pub struct Input<'a> {
    conn: &'a Connection,
}

impl<'a> Input<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn mouse_event(
        &self,
        kind: &str,
        x: f64,
        y: f64,
        button: Option<MouseButton>,
        click_count: Option<i32>,
        delta: Option<(f64, f64)>,
    ) -> Result<()> {
        self.conn
            .call(DispatchMouseEventParams {
                kind: kind.to_string(),
                x,
                y,
                button: button.map(MouseButton::as_wire).map(String::from),
                click_count,
                delta_x: delta.map(|d| d.0),
                delta_y: delta.map(|d| d.1),
            })
            .await?;
        Ok(())
    }

    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<()> {
        self.mouse_event("mouseMoved", x, y, None, None, None).await
    }

    pub async fn mouse_down(&self, x: f64, y: f64, button: MouseButton) -> Result<()> {
        self.mouse_event("mousePressed", x, y, Some(button), Some(1), None)
            .await
    }

    pub async fn mouse_up(&self, x: f64, y: f64, button: MouseButton) -> Result<()> {
        self.mouse_event("mouseReleased", x, y, Some(button), Some(1), None)
            .await
    }

    /// Synthesises a full click (down + up) at one point.
    pub async fn mouse_click(
        &self,
        x: f64,
        y: f64,
        button: MouseButton,
        click_count: i32,
    ) -> Result<()> {
        self.mouse_event("mousePressed", x, y, Some(button), Some(click_count), None)
            .await?;
        self.mouse_event("mouseReleased", x, y, Some(button), Some(click_count), None)
            .await
    }

    /// `Input.dispatchMouseEvent` with `type: "mouseWheel"`, the CDP idiom
    /// for synthetic scrolling.
    pub async fn scroll_by(&self, x: f64, y: f64, delta_x: f64, delta_y: f64) -> Result<()> {
        self.mouse_event("mouseWheel", x, y, None, None, Some((delta_x, delta_y)))
            .await
    }

    pub async fn key_down(&self, code: impl Into<String>) -> Result<()> {
        self.conn
            .call(DispatchKeyEventParams {
                kind: "keyDown".to_string(),
                text: None,
                code: code.into(),
            })
            .await?;
        Ok(())
    }

    pub async fn key_up(&self, code: impl Into<String>) -> Result<()> {
        self.conn
            .call(DispatchKeyEventParams {
                kind: "keyUp".to_string(),
                text: None,
                code: code.into(),
            })
            .await?;
        Ok(())
    }

    /// Dispatches a down+up pair per character; key-code tables are out
    /// of scope, so each grapheme is sent as the event's `text` field
    /// rather than a named key code.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        for ch in text.chars() {
            let s = ch.to_string();
            self.conn
                .call(DispatchKeyEventParams {
                    kind: "keyDown".to_string(),
                    text: Some(s.clone()),
                    code: s.clone(),
                })
                .await?;
            self.conn
                .call(DispatchKeyEventParams {
                    kind: "keyUp".to_string(),
                    text: Some(s.clone()),
                    code: s,
                })
                .await?;
        }
        Ok(())
    }

    async fn touch_event(&self, kind: &str, points: &[(f64, f64)]) -> Result<()> {
        self.conn
            .call(DispatchTouchEventParams {
                kind: kind.to_string(),
                touch_points: points.iter().map(|&(x, y)| TouchPoint { x, y }).collect(),
            })
            .await?;
        Ok(())
    }

    pub async fn touch_start(&self, points: &[(f64, f64)]) -> Result<()> {
        self.touch_event("touchStart", points).await
    }

    pub async fn touch_move(&self, points: &[(f64, f64)]) -> Result<()> {
        self.touch_event("touchMove", points).await
    }

    pub async fn touch_end(&self) -> Result<()> {
        self.touch_event("touchEnd", &[]).await
    }

    /// `touch_start` immediately followed by `touch_end` at one point.
    pub async fn tap(&self, x: f64, y: f64) -> Result<()> {
        self.touch_start(&[(x, y)]).await?;
        self.touch_end().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_wire_names() {
        assert_eq!(MouseButton::Left.as_wire(), "left");
        assert_eq!(MouseButton::Middle.as_wire(), "middle");
        assert_eq!(MouseButton::Right.as_wire(), "right");
    }
}
