//! Settings page: entering the IP addresses of the inverters to poll.
//!
//! Storage of [`Settings`] is up to the caller; this page only edits it.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use crate::colors::{BLACK, WHITE};
use crate::config::PAGE_WIDTH;
use crate::error::EmmError;
use crate::geometry::Rect;
use crate::log_buffer::LogBuffer;
use crate::styles::{CENTERED, LABEL_STYLE_BLACK, LEFT_ALIGNED, TITLE_STYLE_BLACK};
use crate::thresholds::MAX_CONFIGURED_IPS;
use crate::touch::TouchInfo;
use crate::widgets::Button;

/// Longest dotted quad, "255.255.255.255".
pub const IP_TEXT_LEN: usize = 15;

const ENTRY: Rect = Rect::new(8.0, 28.0, 224.0, 20.0);

const KEY_COLUMNS: usize = 5;
const KEY_W: f32 = 44.0;
const KEY_H: f32 = 28.0;
const KEY_TOP: f32 = 54.0;

const STATUS_Y: i32 = 160;
const LIST_TOP: i32 = 176;
const LIST_ROW: i32 = 12;
const LIST_ROWS: usize = 5;

// =============================================================================
// Settings Model
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// IPv4 addresses, most significant octet first.
    pub configured_ips: Vec<u32, MAX_CONFIGURED_IPS>,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            configured_ips: Vec::new(),
        }
    }

    pub fn add_ip(
        &mut self,
        ip: u32,
    ) -> Result<(), EmmError> {
        self.configured_ips.push(ip).map_err(|_| EmmError::IpCapacity)
    }

    pub fn remove_last(&mut self) -> Option<u32> { self.configured_ips.pop() }
}

/// Parse `a.b.c.d` into a big-endian `u32`.
pub fn parse_ipv4(text: &str) -> Result<u32, EmmError> {
    let mut ip = 0u32;
    let mut octets = 0;
    for part in text.split('.') {
        if octets == 4 || part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EmmError::InvalidIp);
        }
        let octet: u8 = part.parse().map_err(|_| EmmError::InvalidIp)?;
        ip = (ip << 8) | u32::from(octet);
        octets += 1;
    }
    if octets == 4 { Ok(ip) } else { Err(EmmError::InvalidIp) }
}

/// Format a big-endian `u32` as `a.b.c.d`.
pub fn format_ipv4(ip: u32) -> String<IP_TEXT_LEN> {
    let [a, b, c, d] = ip.to_be_bytes();
    let mut text = String::new();
    // 15 characters always fit
    write!(text, "{a}.{b}.{c}.{d}").ok();
    text
}

// =============================================================================
// Keypad
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,
    D0,
    Dot,
    Back,
    Add,
    Remove,
}

impl Key {
    pub const COUNT: usize = 14;
    pub const ALL: [Self; Self::COUNT] = [
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::D8,
        Self::D9,
        Self::D0,
        Self::Dot,
        Self::Back,
        Self::Add,
        Self::Remove,
    ];

    #[inline]
    pub const fn index(self) -> usize { self as usize }

    pub const fn label(self) -> &'static str {
        match self {
            Self::D1 => "1",
            Self::D2 => "2",
            Self::D3 => "3",
            Self::D4 => "4",
            Self::D5 => "5",
            Self::D6 => "6",
            Self::D7 => "7",
            Self::D8 => "8",
            Self::D9 => "9",
            Self::D0 => "0",
            Self::Dot => ".",
            Self::Back => "<",
            Self::Add => "Add",
            Self::Remove => "Del",
        }
    }

    /// Character typed by this key, if any.
    const fn typed(self) -> Option<char> {
        match self {
            Self::D1 => Some('1'),
            Self::D2 => Some('2'),
            Self::D3 => Some('3'),
            Self::D4 => Some('4'),
            Self::D5 => Some('5'),
            Self::D6 => Some('6'),
            Self::D7 => Some('7'),
            Self::D8 => Some('8'),
            Self::D9 => Some('9'),
            Self::D0 => Some('0'),
            Self::Dot => Some('.'),
            Self::Back | Self::Add | Self::Remove => None,
        }
    }

    fn rect(self) -> Rect {
        let i = self.index();
        let col = (i % KEY_COLUMNS) as f32;
        let row = (i / KEY_COLUMNS) as f32;
        Rect::new(4.0 + col * (KEY_W + 3.0), KEY_TOP + row * (KEY_H + 3.0), KEY_W, KEY_H)
    }
}

// =============================================================================
// Page
// =============================================================================

pub struct SettingsPage {
    pub base_offset: f32,
    keys: [Button; Key::COUNT],
    entry: String<IP_TEXT_LEN>,
    status: String<32>,
    log: LogBuffer,
}

impl SettingsPage {
    pub fn new() -> Self {
        Self {
            base_offset: 2.0 * PAGE_WIDTH,
            keys: core::array::from_fn(|i| {
                let key = Key::ALL[i];
                Button::new(key.rect(), key.label())
            }),
            entry: String::new(),
            status: String::new(),
            log: LogBuffer::new(),
        }
    }

    #[inline]
    pub fn entry(&self) -> &str { &self.entry }

    #[inline]
    pub fn status(&self) -> &str { &self.status }

    #[inline]
    pub fn log(&self) -> &LogBuffer { &self.log }

    #[inline]
    pub fn key(
        &self,
        key: Key,
    ) -> &Button {
        &self.keys[key.index()]
    }

    fn set_status(
        &mut self,
        args: core::fmt::Arguments<'_>,
    ) {
        self.status.clear();
        // Overlong status lines are cut
        self.status.write_fmt(args).ok();
    }

    /// Apply one key press to the entry field and `settings`.
    pub fn press(
        &mut self,
        key: Key,
        settings: &mut Settings,
    ) {
        if let Some(c) = key.typed() {
            // Full entry ignores further input
            self.entry.push(c).ok();
            return;
        }
        match key {
            Key::Back => {
                self.entry.pop();
            }
            Key::Add => match parse_ipv4(&self.entry).and_then(|ip| settings.add_ip(ip).map(|()| ip)) {
                Ok(ip) => {
                    self.set_status(format_args!("Added {}", format_ipv4(ip)));
                    self.entry.clear();
                }
                Err(err) => {
                    log_warn!(self.log, "Rejected IP '{}': {}", self.entry, err);
                    self.set_status(format_args!("{err}"));
                }
            },
            Key::Remove => match settings.remove_last() {
                Some(ip) => self.set_status(format_args!("Removed {}", format_ipv4(ip))),
                None => self.set_status(format_args!("No IPs")),
            },
            _ => {}
        }
    }

    /// Returns true when a key owns the touch.
    pub fn handle_touch(
        &mut self,
        touch: &TouchInfo,
        x_offset: f32,
        settings: &mut Settings,
    ) -> bool {
        let ox = self.base_offset + x_offset;
        let mut handled = false;
        let mut clicked = None;
        for key in Key::ALL {
            let response = self.keys[key.index()].handle_touch(touch, ox);
            handled |= response.handled;
            if response.clicked {
                clicked = Some(key);
            }
        }
        if let Some(key) = clicked {
            self.press(key, settings);
        }
        handled
    }

    pub fn draw<D>(
        &self,
        display: &mut D,
        x_offset: f32,
        settings: &Settings,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let ox = self.base_offset + x_offset;
        if ox > PAGE_WIDTH || ox + PAGE_WIDTH < 0.0 {
            return;
        }

        Text::with_text_style("Settings", Point::new((ox + PAGE_WIDTH / 2.0) as i32, 16), TITLE_STYLE_BLACK, CENTERED)
            .draw(display)
            .ok();

        let entry = ENTRY.translate(ox, 0.0);
        let field = PrimitiveStyleBuilder::new().fill_color(WHITE).stroke_color(BLACK).stroke_width(1).build();
        Rectangle::new(Point::new(entry.x as i32, entry.y as i32), Size::new(entry.w as u32, entry.h as u32))
            .into_styled(field)
            .draw(display)
            .ok();
        Text::with_text_style(
            &self.entry,
            Point::new(entry.x as i32 + 4, entry.bottom() as i32 - 6),
            LABEL_STYLE_BLACK,
            LEFT_ALIGNED,
        )
        .draw(display)
        .ok();

        for key in &self.keys {
            key.draw(display, ox, false);
        }

        let left = ox as i32 + 8;
        Text::with_text_style(&self.status, Point::new(left, STATUS_Y), LABEL_STYLE_BLACK, LEFT_ALIGNED)
            .draw(display)
            .ok();

        // Two columns, newest entries last
        for (i, ip) in settings.configured_ips.iter().take(LIST_ROWS * 2).enumerate() {
            let x = left + (i / LIST_ROWS) as i32 * 112;
            let y = LIST_TOP + (i % LIST_ROWS) as i32 * LIST_ROW;
            Text::with_text_style(&format_ipv4(*ip), Point::new(x, y), LABEL_STYLE_BLACK, LEFT_ALIGNED)
                .draw(display)
                .ok();
        }
    }
}

impl Default for SettingsPage {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::log_buffer::LogLevel;
    use crate::test_support::CountingDisplay;

    fn type_text(
        page: &mut SettingsPage,
        settings: &mut Settings,
        text: &str,
    ) {
        for c in text.chars() {
            let key = Key::ALL.into_iter().find(|k| k.typed() == Some(c));
            if let Some(key) = key {
                page.press(key, settings);
            }
        }
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("192.168.1.20"), Ok(0xC0A8_0114));
        assert_eq!(parse_ipv4("0.0.0.0"), Ok(0));
        assert_eq!(parse_ipv4("255.255.255.255"), Ok(u32::MAX));
        assert_eq!(parse_ipv4("256.1.1.1"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("1.2.3"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("1.2.3.4.5"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("1..3.4"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4(""), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("+1.2.3.4"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("1.2.-0.4"), Err(EmmError::InvalidIp));
        assert_eq!(parse_ipv4("1.2. 3.4"), Err(EmmError::InvalidIp));
    }

    #[test]
    fn test_format_ipv4() {
        assert_eq!(format_ipv4(0xC0A8_0114).as_str(), "192.168.1.20");
        assert_eq!(format_ipv4(u32::MAX).as_str(), "255.255.255.255");
    }

    #[test]
    fn test_keypad_adds_ip() {
        let mut page = SettingsPage::new();
        let mut settings = Settings::new();
        type_text(&mut page, &mut settings, "10.0.0.77");
        page.press(Key::Back, &mut settings);
        assert_eq!(page.entry(), "10.0.0.7");
        page.press(Key::Add, &mut settings);
        assert_eq!(settings.configured_ips.as_slice(), [0x0A00_0007]);
        assert_eq!(page.entry(), "");
        assert_eq!(page.status(), "Added 10.0.0.7");
    }

    #[test]
    fn test_invalid_entry_is_kept() {
        let mut page = SettingsPage::new();
        let mut settings = Settings::new();
        type_text(&mut page, &mut settings, "10.0.0");
        page.press(Key::Add, &mut settings);
        assert!(settings.configured_ips.is_empty());
        assert_eq!(page.entry(), "10.0.0");
        assert_eq!(page.status(), "invalid IP address");
        assert_eq!(page.log().count_level(LogLevel::Warn), 1);
    }

    #[test]
    fn test_entry_length_is_bounded() {
        let mut page = SettingsPage::new();
        let mut settings = Settings::new();
        type_text(&mut page, &mut settings, "111.111.111.111.111");
        assert_eq!(page.entry().len(), IP_TEXT_LEN);
    }

    #[test]
    fn test_ip_capacity() {
        let mut settings = Settings::new();
        for i in 0..MAX_CONFIGURED_IPS as u32 {
            assert_eq!(settings.add_ip(i), Ok(()));
        }
        assert_eq!(settings.add_ip(99), Err(EmmError::IpCapacity));
        assert_eq!(settings.remove_last(), Some(MAX_CONFIGURED_IPS as u32 - 1));
    }

    #[test]
    fn test_remove_key() {
        let mut page = SettingsPage::new();
        let mut settings = Settings::new();
        page.press(Key::Remove, &mut settings);
        assert_eq!(page.status(), "No IPs");
        settings.add_ip(0x0102_0304).ok();
        page.press(Key::Remove, &mut settings);
        assert!(settings.configured_ips.is_empty());
        assert_eq!(page.status(), "Removed 1.2.3.4");
    }

    #[test]
    fn test_touch_on_key() {
        let mut page = SettingsPage::new();
        let mut settings = Settings::new();
        let x_offset = -2.0 * PAGE_WIDTH;
        let at: Vec2 = page.key(Key::D7).rect.center();
        assert!(page.handle_touch(&TouchInfo::from_samples(None, Some(at)), x_offset, &mut settings));
        assert!(page.handle_touch(&TouchInfo::from_samples(Some(at), None), x_offset, &mut settings));
        assert_eq!(page.entry(), "7");
        // Same spot while the page is scrolled away hits nothing
        assert!(!page.handle_touch(&TouchInfo::from_samples(None, Some(at)), 0.0, &mut settings));
    }

    #[test]
    fn test_draw_lists_ips() {
        let page = SettingsPage::new();
        let mut settings = Settings::new();
        settings.add_ip(0x0A00_0001).ok();
        let mut display = CountingDisplay::new();
        page.draw(&mut display, 0.0, &settings);
        assert_eq!(display.drawn, 0);
        page.draw(&mut display, -2.0 * PAGE_WIDTH, &settings);
        assert!(display.drawn > 0);
    }
}
