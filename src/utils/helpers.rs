//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Prefix the messaging vendor expects on WhatsApp addresses
pub const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Ensure a recipient is addressed on the WhatsApp channel
pub fn format_whatsapp_address(to: &str) -> String {
    let to = to.trim();
    if to.starts_with(WHATSAPP_PREFIX) {
        to.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, to)
    }
}

/// Hide all but the last four digits of a phone number for logs
pub fn mask_phone(phone: &str) -> String {
    let digits = phone.trim_start_matches(WHATSAPP_PREFIX);
    let count = digits.chars().count();
    if count <= 4 {
        return digits.to_string();
    }
    let visible: String = digits.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), visible)
}

/// Generate a UTR reference for QR/UPI payments, at most 16 characters
pub fn generate_utr_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    let mut utr = format!("UTR{}{}", millis, suffix);
    utr.truncate(16);
    utr
}

/// Generate a 15-digit registration identifier derived from a keyword,
/// the registrant email and the current time
pub fn generate_registration_id(keyword: &str, email: &str) -> String {
    let now = Utc::now();
    let raw = format!("{}|{}|{}", keyword, email, now.to_rfc3339());

    let mut hash: i32 = 0;
    for unit in raw.encode_utf16() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32);
    }

    let mut id: String = format!("{}{}", now.timestamp_millis(), hash.unsigned_abs())
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    while id.len() < 15 {
        id.push(char::from(b'0' + rand::thread_rng().gen_range(0..10u8)));
    }
    id.truncate(15);
    id
}

/// Generate a payment receipt reference
pub fn generate_receipt() -> String {
    format!("receipt_{}", Utc::now().timestamp_millis())
}

/// Calculate pagination offset; `None` when the page lies past `usize`
pub fn calculate_offset(page: usize, page_size: usize) -> Option<usize> {
    page.saturating_sub(1).checked_mul(page_size)
}

/// Number of pages needed for a total
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Check whether an optional field holds something other than whitespace
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whatsapp_address() {
        assert_eq!(format_whatsapp_address("+919876543210"), "whatsapp:+919876543210");
        assert_eq!(format_whatsapp_address("whatsapp:+919876543210"), "whatsapp:+919876543210");
        assert_eq!(format_whatsapp_address(" +1555 "), "whatsapp:+1555");
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("whatsapp:+919876543210"), "*********3210");
        assert_eq!(mask_phone("123"), "123");
    }

    #[test]
    fn test_utr_number_shape() {
        let utr = generate_utr_number();
        assert!(utr.starts_with("UTR"));
        assert!(utr.len() <= 16);
    }

    #[test]
    fn test_registration_id_is_fifteen_digits() {
        let id = generate_registration_id("free", "dev@example.com");
        assert_eq!(id.len(), 15);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_pagination() {
        assert_eq!(calculate_offset(1, 10), Some(0));
        assert_eq!(calculate_offset(3, 10), Some(20));
        assert_eq!(calculate_offset(usize::MAX, 2), None);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(Some("x")));
        assert!(!is_present(Some("   ")));
        assert!(!is_present(None));
    }
}
