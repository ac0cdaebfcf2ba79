// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HLA 1516e basic data representations (big-endian).
//!
//! Decoders are strict: a buffer whose length does not match the
//! representation yields `None`.

pub(crate) fn encode_octet(v: u8) -> Vec<u8> {
    vec![v]
}

pub(crate) fn decode_octet(buf: &[u8]) -> Option<u8> {
    match buf {
        [b] => Some(*b),
        _ => None,
    }
}

/// HLAunicodeChar: one UTF-16 code unit. Chars outside the BMP do not fit.
pub(crate) fn encode_unicode_char(c: char) -> Option<Vec<u8>> {
    let mut units = [0u16; 2];
    match c.encode_utf16(&mut units) {
        [unit] => Some(unit.to_be_bytes().to_vec()),
        _ => None,
    }
}

pub(crate) fn decode_unicode_char(buf: &[u8]) -> Option<char> {
    let bytes: [u8; 2] = buf.try_into().ok()?;
    char::from_u32(u32::from(u16::from_be_bytes(bytes)))
}

pub(crate) fn encode_i16(v: i16) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub(crate) fn decode_i16(buf: &[u8]) -> Option<i16> {
    Some(i16::from_be_bytes(buf.try_into().ok()?))
}

pub(crate) fn encode_i32(v: i32) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub(crate) fn decode_i32(buf: &[u8]) -> Option<i32> {
    Some(i32::from_be_bytes(buf.try_into().ok()?))
}

pub(crate) fn encode_i64(v: i64) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub(crate) fn decode_i64(buf: &[u8]) -> Option<i64> {
    Some(i64::from_be_bytes(buf.try_into().ok()?))
}

pub(crate) fn encode_f32(v: f32) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub(crate) fn decode_f32(buf: &[u8]) -> Option<f32> {
    Some(f32::from_be_bytes(buf.try_into().ok()?))
}

pub(crate) fn encode_f64(v: f64) -> Vec<u8> {
    v.to_be_bytes().to_vec()
}

pub(crate) fn decode_f64(buf: &[u8]) -> Option<f64> {
    Some(f64::from_be_bytes(buf.try_into().ok()?))
}

/// HLAboolean is an enumeration over HLAinteger32BE (HLAfalse = 0, HLAtrue = 1).
pub(crate) fn encode_boolean(v: bool) -> Vec<u8> {
    encode_i32(i32::from(v))
}

pub(crate) fn decode_boolean(buf: &[u8]) -> Option<bool> {
    match decode_i32(buf)? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// HLAunicodeString: HLAinteger32BE element count followed by UTF-16BE code units.
pub(crate) fn encode_unicode_string(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out = Vec::with_capacity(4 + units.len() * 2);
    out.extend_from_slice(&(units.len() as i32).to_be_bytes());
    for unit in units {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

pub(crate) fn decode_unicode_string(buf: &[u8]) -> Option<String> {
    if buf.len() < 4 {
        return None;
    }
    let (len_bytes, body) = buf.split_at(4);
    let count = usize::try_from(decode_i32(len_bytes)?).ok()?;
    if body.len() != count.checked_mul(2)? {
        return None;
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
