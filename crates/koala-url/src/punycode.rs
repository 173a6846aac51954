//! Punycode (RFC 3492), the bounded-integer encoding IDNA uses for
//! internationalised domain labels.
//!
//! Decoding is grounded on the original engine's `Punycode::to_utf8`;
//! encoding is its algorithmic inverse (RFC 3492 §6.3), needed here because
//! this port does its own domain-to-ASCII instead of delegating to ICU.

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 128;
const DELIMITER: char = '-';

fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + ((BASE - T_MIN + 1) * delta) / (delta + SKEW)
}

fn digit_value(cp: char) -> Option<u32> {
    match cp {
        'A'..='Z' => Some(cp as u32 - 'A' as u32),
        'a'..='z' => Some(cp as u32 - 'a' as u32),
        '0'..='9' => Some(cp as u32 - '0' as u32 + 26),
        _ => None,
    }
}

fn digit_char(d: u32) -> char {
    if d < 26 {
        char::from_u32('a' as u32 + d).unwrap_or('a')
    } else {
        char::from_u32('0' as u32 + d - 26).unwrap_or('0')
    }
}

/// [RFC 3492 § 6.2 Decoding procedure](https://datatracker.ietf.org/doc/html/rfc3492#section-6.2)
#[must_use]
pub fn decode(encoded: &str) -> Option<String> {
    let mut n = INITIAL_N;
    let mut i: i64 = 0;
    let mut bias = INITIAL_BIAS;
    let mut output: Vec<u32> = Vec::new();

    let (basic, mut rest) = match encoded.rfind(DELIMITER) {
        Some(pos) => (&encoded[..pos], &encoded[pos + 1..]),
        None => ("", encoded),
    };

    if !basic.is_empty() {
        for cp in basic.chars() {
            if !cp.is_ascii() {
                return None;
            }
            output.push(cp as u32);
        }
    }

    let mut chars = rest.chars().peekable();
    while chars.peek().is_some() {
        let oldi = i;
        let mut w: i64 = 1;
        let mut k = BASE;
        loop {
            let digit = chars.next().and_then(digit_value)?;
            i = i.checked_add(i64::from(digit) * w)?;
            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            w = w.checked_mul(i64::from(BASE - t))?;
            k += BASE;
        }

        let out_len = u32::try_from(output.len() + 1).ok()?;
        bias = adapt(u32::try_from(i - oldi).ok()?, out_len, oldi == 0);
        n = n.checked_add(u32::try_from(i).ok()? / out_len)?;
        i %= i64::from(out_len);
        let insert_at = usize::try_from(i).ok()?;
        if insert_at > output.len() {
            return None;
        }
        output.insert(insert_at, n);
        i += 1;
    }

    // Used only to keep `rest` alive through the loop without a needless
    // reborrow warning; the chars iterator already consumed it.
    rest = "";
    let _ = rest;

    output.into_iter().map(char::from_u32).collect()
}

/// [RFC 3492 § 6.3 Encoding procedure](https://datatracker.ietf.org/doc/html/rfc3492#section-6.3)
#[must_use]
pub fn encode(input: &str) -> Option<String> {
    let code_points: Vec<u32> = input.chars().map(|c| c as u32).collect();

    let mut output = String::new();
    for &cp in &code_points {
        if cp < 0x80 {
            output.push(cp as u8 as char);
        }
    }
    let basic_len = output.len();
    let mut handled = basic_len;
    let input_len = code_points.len();

    if basic_len > 0 {
        output.push(DELIMITER);
    }

    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;

    while handled < input_len {
        let m = code_points.iter().copied().filter(|&cp| cp >= n).min()?;

        delta = delta.checked_add((m - n).checked_mul(u32::try_from(handled + 1).ok()?)?)?;
        n = m;

        for &cp in &code_points {
            if cp < n {
                delta = delta.checked_add(1)?;
            }
            if cp == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };
                    if q < t {
                        break;
                    }
                    output.push(digit_char(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(digit_char(q));
                bias = adapt(delta, u32::try_from(handled + 1).ok()?, handled == basic_len);
                delta = 0;
                handled += 1;
            }
        }

        delta += 1;
        n += 1;
    }

    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_pure_ascii_label() {
        assert_eq!(decode("xample-").as_deref(), Some("xample-"));
    }

    #[test]
    fn decode_known_vector() {
        // "bücher" -> Punycode "bcher-kva" per RFC 3492 examples.
        assert_eq!(decode("bcher-kva").as_deref(), Some("bücher"));
    }

    #[test]
    fn encode_then_decode_round_trips() {
        for s in ["münchen", "日本語", "bücher", "xn"] {
            let encoded = encode(s).expect("encodable");
            assert_eq!(decode(&encoded).as_deref(), Some(s));
        }
    }

    #[test]
    fn encode_is_noop_marker_free_for_pure_ascii() {
        assert_eq!(encode("abc").as_deref(), Some("abc"));
    }
}
