use crate::error::ValidationError;
use percent_encoding::percent_decode_str;

pub const MAX_CHECKOUT_FORM_BYTES: usize = 64 * 1024;
pub const MAX_ADMIN_FORM_BYTES: usize = 8 * 1024;
pub const MAX_ADDRESS_LEN: usize = 128;

pub fn enforce_body_size(body: &[u8], max_bytes: usize) -> Result<(), &'static str> {
    if body.len() > max_bytes {
        return Err("Payload too large");
    }
    Ok(())
}

/// First value of `name` in an `application/x-www-form-urlencoded` body.
pub fn get_form_field(form: &str, name: &str) -> Option<String> {
    form.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let k = url_decode(parts.next()?);
        if k != name {
            return None;
        }
        Some(url_decode(parts.next().unwrap_or("")))
    })
}

fn url_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().to_string()
}

/// Trims an admin-supplied address. The value stays an opaque key: no
/// parsing or canonicalisation beyond whitespace.
pub fn sanitize_address(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    if trimmed.chars().count() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_ADDRESS_LEN,
        });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::ControlCharacters(field));
    }
    Ok(trimmed.to_string())
}
