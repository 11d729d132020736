// Copyright 2013 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Punycode ([RFC 3492](http://tools.ietf.org/html/rfc3492)) implementation.
//!
//! `encode` and `decode` work on bare Punycode as the RFC defines it.
//! `encode_label` and `decode_label` work on a single domain label: they
//! add or strip the `xn--` prefix and enforce the DNS label length.

use crate::{Error, Outcome, ACE_PREFIX, MAX_LABEL_LENGTH};
use smallvec::SmallVec;
use std::convert::TryFrom;

// Bootstring parameters for Punycode
const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: u8 = b'-';

#[inline]
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

#[inline]
fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

/// Convert Punycode to an Unicode `String`.
///
/// Return None on malformed input or overflow.
/// Overflow can only happen on inputs that take more than
/// 63 encoded bytes, the DNS limit on domain name labels.
#[inline]
pub fn decode_to_string(input: &str) -> Option<String> {
    Some(Decoder::default().decode(input.as_bytes()).ok()?.collect())
}

/// Convert Punycode to Unicode.
///
/// Return None on malformed input or overflow.
/// Overflow can only happen on inputs that take more than
/// 63 encoded bytes, the DNS limit on domain name labels.
pub fn decode(input: &str) -> Option<Vec<char>> {
    Some(Decoder::default().decode(input.as_bytes()).ok()?.collect())
}

/// Decode one ACE label.
///
/// Labels without the (case-sensitive) `xn--` prefix are `Unchanged`.
/// The basic code points before the last delimiter are copied verbatim.
pub fn decode_label(label: &str) -> Result<Outcome<Vec<char>>, Error> {
    if label.len() > MAX_LABEL_LENGTH {
        return Err(Error::LabelTooLong);
    }
    let encoded = match label.strip_prefix(ACE_PREFIX) {
        Some(encoded) => encoded,
        None => return Ok(Outcome::Unchanged),
    };
    let decoded: Vec<char> = Decoder::default().decode(encoded.as_bytes())?.collect();
    if decoded.is_empty() {
        return Err(Error::InvalidPunycode);
    }
    Ok(Outcome::Transformed(decoded))
}

#[inline]
fn digit_value(byte: u8) -> Option<u32> {
    Some(match byte {
        byte @ b'0'..=b'9' => byte - b'0' + 26,
        byte @ b'A'..=b'Z' => byte - b'A',
        byte @ b'a'..=b'z' => byte - b'a',
        _ => return None,
    } as u32)
}

#[derive(Default)]
pub(crate) struct Decoder {
    insertions: SmallVec<[(usize, char); 59]>,
}

impl Decoder {
    /// Split the input into its basic code points and the insertions of
    /// encoded characters.
    pub(crate) fn decode<'a>(&'a mut self, input: &'a [u8]) -> Result<Decode<'a>, Error> {
        self.insertions.clear();
        // Handle "basic" (ASCII) code points.
        // They are encoded as-is before the last delimiter, if any.
        let (base, input) = if let Some(position) = input.iter().rposition(|&b| b == DELIMITER) {
            (
                &input[..position],
                if position > 0 {
                    &input[position + 1..]
                } else {
                    input
                },
            )
        } else {
            (&input[..0], input)
        };

        if !base.is_ascii() {
            return Err(Error::InvalidPunycode);
        }

        let base_len = base.len();
        let mut length = u32::try_from(base_len).map_err(|_| Error::PunycodeOverflow)?;
        let mut code_point = INITIAL_N;
        let mut bias = INITIAL_BIAS;
        let mut i: u32 = 0;
        let mut iter = input.iter();
        loop {
            let previous_i = i;
            let mut weight = 1;
            let mut k = BASE;
            let mut byte = match iter.next() {
                None => break,
                Some(&byte) => byte,
            };

            // Decode a generalized variable-length integer into delta,
            // which gets added to i.
            loop {
                let digit = digit_value(byte).ok_or(Error::InvalidPunycode)?;
                if digit > (u32::MAX - i) / weight {
                    return Err(Error::PunycodeOverflow);
                }
                i += digit * weight;
                let t = threshold(k, bias);
                if digit < t {
                    break;
                }
                if weight > u32::MAX / (BASE - t) {
                    return Err(Error::PunycodeOverflow);
                }
                weight *= BASE - t;
                k += BASE;
                byte = match iter.next() {
                    // End of input before the end of this delta
                    None => return Err(Error::InvalidPunycode),
                    Some(&byte) => byte,
                };
            }

            bias = adapt(i - previous_i, length + 1, previous_i == 0);
            if i / (length + 1) > u32::MAX - code_point {
                return Err(Error::PunycodeOverflow);
            }

            // i was supposed to wrap around from length+1 to 0,
            // incrementing code_point each time.
            code_point += i / (length + 1);
            i %= length + 1;
            if code_point < INITIAL_N {
                // Basic code points only ever appear before the delimiter.
                tracing::warn!(code_point, "punycode insertion of a basic code point");
                return Err(Error::InvalidPunycode);
            }
            // Rejects surrogates and anything past U+10FFFF.
            let c = char::from_u32(code_point).ok_or(Error::InvalidPunycode)?;

            // Move earlier insertions farther out in the string
            for (idx, _) in &mut self.insertions {
                if *idx >= i as usize {
                    *idx += 1;
                }
            }
            self.insertions.push((i as usize, c));
            length += 1;
            i += 1;
        }

        self.insertions.sort_by_key(|(i, _)| *i);
        Ok(Decode {
            base: base.iter(),
            insertions: &self.insertions,
            inserted: 0,
            position: 0,
            len: base_len + self.insertions.len(),
        })
    }
}

pub(crate) struct Decode<'a> {
    base: std::slice::Iter<'a, u8>,
    insertions: &'a [(usize, char)],
    inserted: usize,
    position: usize,
    len: usize,
}

impl<'a> Iterator for Decode<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.insertions.get(self.inserted) {
                Some((pos, c)) if *pos == self.position => {
                    self.inserted += 1;
                    self.position += 1;
                    return Some(*c);
                }
                _ => {}
            }
            if let Some(&byte) = self.base.next() {
                self.position += 1;
                return Some(char::from(byte));
            } else if self.inserted >= self.insertions.len() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len - self.position;
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for Decode<'a> {
    fn len(&self) -> usize {
        self.len - self.position
    }
}

/// Convert an Unicode `str` to Punycode.
///
/// This is a convenience wrapper around `encode`.
#[inline]
pub fn encode_str(input: &str) -> Option<String> {
    let mut buf = String::with_capacity(input.len());
    encode_into(input.chars(), &mut buf).ok().map(|()| buf)
}

/// Convert Unicode to Punycode.
///
/// Return None on overflow, which can only happen on inputs that would take more than
/// 63 encoded bytes, the DNS limit on domain name labels.
pub fn encode(input: &[char]) -> Option<String> {
    let mut buf = String::with_capacity(input.len());
    encode_into(input.iter().copied(), &mut buf)
        .ok()
        .map(|()| buf)
}

/// Encode one label into its `xn--` form.
///
/// An all-ASCII label is its own ACE form and comes back `Unchanged`.
pub fn encode_label(label: &[char]) -> Result<Outcome<String>, Error> {
    let utf16_len: usize = label.iter().map(|c| c.len_utf16()).sum();
    if utf16_len > MAX_LABEL_LENGTH * 2 {
        return Err(Error::LabelTooLong);
    }
    if label.iter().all(char::is_ascii) {
        return Ok(Outcome::Unchanged);
    }
    let mut output = String::with_capacity(ACE_PREFIX.len() + label.len() * 2);
    output.push_str(ACE_PREFIX);
    encode_into(label.iter().copied(), &mut output)?;
    Ok(Outcome::Transformed(output))
}

pub(crate) fn encode_into<I>(input: I, output: &mut String) -> Result<(), Error>
where
    I: Iterator<Item = char> + Clone,
{
    // Handle "basic" (ASCII) code points. They are encoded as-is.
    let (mut input_length, mut basic_length) = (0u32, 0u32);
    for c in input.clone() {
        input_length = input_length
            .checked_add(1)
            .ok_or(Error::PunycodeOverflow)?;
        if c.is_ascii() {
            output.push(c);
            basic_length += 1;
        }
    }

    if basic_length > 0 {
        output.push(char::from(DELIMITER));
    }
    let mut code_point = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut processed = basic_length;
    while processed < input_length {
        // All code points < code_point have been handled already.
        // Find the next larger one.
        let min_code_point = input
            .clone()
            .map(u32::from)
            .filter(|&c| c >= code_point)
            .min()
            .ok_or(Error::InvalidPunycode)?;
        if min_code_point - code_point > (u32::MAX - delta) / (processed + 1) {
            return Err(Error::PunycodeOverflow);
        }
        // Increase delta to advance the decoder’s <code_point,i> state to <min_code_point,0>
        delta += (min_code_point - code_point) * (processed + 1);
        code_point = min_code_point;
        for c in input.clone() {
            let c = u32::from(c);
            if c < code_point {
                delta = delta.checked_add(1).ok_or(Error::PunycodeOverflow)?;
            }
            if c == code_point {
                // Represent delta as a generalized variable-length integer:
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    let value = t + ((q - t) % (BASE - t));
                    output.push(value_to_digit(value));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(value_to_digit(q));
                bias = adapt(delta, processed + 1, processed == basic_length);
                delta = 0;
                processed += 1;
            }
        }
        delta = delta.checked_add(1).ok_or(Error::PunycodeOverflow)?;
        code_point += 1;
    }
    Ok(())
}

#[inline]
fn value_to_digit(value: u32) -> char {
    // value < BASE
    let value = value as u8;
    if value < 26 {
        char::from(value + b'a')
    } else {
        char::from(value - 26 + b'0')
    }
}
