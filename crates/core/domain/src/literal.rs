//! 无符号整数字面量解析。
//!
//! 按前缀自动识别进制：`0x`/`0X` 十六进制、`0o`/`0O` 或前导 `0` 八进制、
//! `0b`/`0B` 二进制，其余按十进制解析。允许 `_` 作为数字分隔符。

/// 字面量解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("empty literal")]
    Empty,
    #[error("invalid digits in literal '{0}'")]
    Invalid(String),
    #[error("literal '{0}' exceeds {1} bits")]
    OutOfRange(String, u32),
}

/// 解析不超过 `bits` 位宽的无符号整数。
pub fn parse_uint(text: &str, bits: u32) -> Result<u64, LiteralError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LiteralError::Empty);
    }

    let (radix, digits) = split_radix(trimmed);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(LiteralError::Invalid(trimmed.to_string()));
    }
    let value = u64::from_str_radix(&digits, radix).map_err(|err| match err.kind() {
        std::num::IntErrorKind::PosOverflow => LiteralError::OutOfRange(trimmed.to_string(), bits),
        _ => LiteralError::Invalid(trimmed.to_string()),
    })?;

    if bits < 64 && value >> bits != 0 {
        return Err(LiteralError::OutOfRange(trimmed.to_string(), bits));
    }
    Ok(value)
}

fn split_radix(text: &str) -> (u32, &str) {
    let lower = text.as_bytes();
    if lower.len() > 2 && lower[0] == b'0' {
        match lower[1] {
            b'x' | b'X' => return (16, &text[2..]),
            b'o' | b'O' => return (8, &text[2..]),
            b'b' | b'B' => return (2, &text[2..]),
            _ => {}
        }
    }
    if lower.len() > 1 && lower[0] == b'0' {
        return (8, &text[1..]);
    }
    (10, text)
}
