//! Test data builders

use hackportal::models::lobby::{CreateLobbyRequest, Difficulty, LobbyType};
use hackportal::state::RegistrantDetails;
use serde_json::{json, Value};

/// Demo lobby ids seeded by `DatabaseService::seed_demo_lobbies`
pub const AI_LOBBY_ID: &str = "1";
pub const DEFI_LOBBY_ID: &str = "2";

pub fn lobby_request(title: &str, max_participants: u32) -> CreateLobbyRequest {
    CreateLobbyRequest {
        title: title.to_string(),
        description: "A weekend of building".to_string(),
        category: "AI/ML".to_string(),
        difficulty: Difficulty::Intermediate,
        lobby_type: LobbyType::Virtual,
        skills: vec!["Rust".to_string(), "Python".to_string()],
        max_participants,
        prize: "$5,000".to_string(),
        duration: "48 hours".to_string(),
        start_date: "2026-11-01".to_string(),
        end_date: "2026-11-03".to_string(),
        tags: vec!["AI".to_string()],
        organizer: "HackPortal".to_string(),
        host: "Test Host".to_string(),
        location: None,
        requirements: vec!["Laptop".to_string()],
        featured: false,
    }
}

pub fn registrant(email: &str) -> RegistrantDetails {
    RegistrantDetails {
        name: "Asha Rao".to_string(),
        email: email.to_string(),
        phone: "9876543210".to_string(),
        college_name: "IIT Madras".to_string(),
        whatsapp: "9876543210".to_string(),
    }
}

pub fn free_registration_body(hackathon_id: &str, email: &str) -> Value {
    json!({
        "hackathonId": hackathon_id,
        "email": email,
        "name": "Asha Rao",
        "phone": "9876543210",
        "collegeName": "IIT Madras",
        "amount": 0,
    })
}

pub fn qr_registration_body(hackathon_id: &str, email: &str) -> Value {
    json!({
        "hackathonId": hackathon_id,
        "email": email,
        "name": "Asha Rao",
        "phone": "9876543210",
        "amount": 499,
        "utrNumber": "UTR123456789012",
        "screenshotUrl": "https://cdn.example.org/screens/1.png",
    })
}

pub fn create_order_body(hackathon_id: &str, email: &str, amount: f64) -> Value {
    json!({
        "amount": amount,
        "name": "Asha Rao",
        "email": email,
        "contact": "9876543210",
        "hackathonId": hackathon_id,
    })
}

pub const FORM_BOUNDARY: &str = "hackportal-form-boundary";

/// A `multipart/form-data` body with text fields and an optional
/// `screenshot` file given as (file name, content type, bytes)
pub fn multipart_body(fields: &[(&str, &str)], screenshot: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                FORM_BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = screenshot {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"screenshot\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                FORM_BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", FORM_BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", FORM_BOUNDARY)
}
