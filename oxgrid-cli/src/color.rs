//! Color parsing: a small named-color table plus `#rgb`, `#rrggbb`, and
//! `rgb(r,g,b)` forms.

use anyhow::{anyhow, Result};
use image::Rgb;

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("magenta", [255, 0, 255]),
    ("cyan", [0, 255, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("pink", [255, 192, 203]),
    ("palegreen", [152, 251, 152]),
    ("limegreen", [50, 205, 50]),
];

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn from_hex(text: &str) -> Option<Rgb<u8>> {
    let digits: Option<Vec<u8>> = text.bytes().map(hex_nibble).collect();
    let digits = digits?;
    match digits.len() {
        3 => Some(Rgb([
            digits[0] * 17,
            digits[1] * 17,
            digits[2] * 17,
        ])),
        6 => Some(Rgb([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ])),
        _ => None,
    }
}

fn from_rgb_call(text: &str) -> Option<Rgb<u8>> {
    let inner = text.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|v| v.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Rgb([r, g, b]))
}

pub fn parse_color(text: &str) -> Result<Rgb<u8>> {
    if let Some(hex) = text.strip_prefix('#') {
        return from_hex(hex).ok_or_else(|| anyhow!("bad color {:?}", text));
    }
    if text.starts_with("rgb(") {
        return from_rgb_call(text).ok_or_else(|| anyhow!("bad color {:?}", text));
    }
    let lower = text.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|&(_, c)| Rgb(c))
        .ok_or_else(|| anyhow!("unknown color {:?}", text))
}
