//! Database service layer
//!
//! This module provides a high-level interface to the in-memory repositories

use tracing::info;
use crate::database::{
    LobbyRepository, NotificationRepository, OrderRepository, RegistrationRepository, TeamMessageRepository,
};
use crate::models::lobby::{Lobby, Difficulty, LobbyType, LobbyStatus};
use crate::utils::errors::HackPortalError;

#[derive(Debug, Clone, Default)]
pub struct DatabaseService {
    pub lobbies: LobbyRepository,
    pub notifications: NotificationRepository,
    pub orders: OrderRepository,
    pub registrations: RegistrationRepository,
    pub team_messages: TeamMessageRepository,
}

impl DatabaseService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the demo lobby catalogue; lobbies that already exist are skipped
    pub async fn seed_demo_lobbies(&self) -> Result<usize, HackPortalError> {
        let mut seeded = 0;
        for lobby in demo_lobbies() {
            if self.lobbies.find_by_id(&lobby.id).await?.is_some() {
                continue;
            }
            self.lobbies.insert(lobby).await?;
            seeded += 1;
        }
        info!("Seeded {} demo lobbies", seeded);
        Ok(seeded)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn demo_lobbies() -> Vec<Lobby> {
    vec![
        Lobby {
            id: "1".to_string(),
            title: "AI Innovation Challenge".to_string(),
            description: "Build an AI solution that addresses real-world problems in healthcare, education, or climate change.".to_string(),
            category: "AI/ML".to_string(),
            difficulty: Difficulty::Advanced,
            lobby_type: LobbyType::Virtual,
            skills: strings(&["Python", "TensorFlow", "Machine Learning"]),
            participants: 45,
            max_participants: 60,
            prize: "₹50,000".to_string(),
            duration: "48 hours".to_string(),
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-17".to_string(),
            status: LobbyStatus::Upcoming,
            tags: strings(&["AI", "Healthcare", "Climate"]),
            organizer: "TechCorp".to_string(),
            host: "Dr. Sarah Chen".to_string(),
            location: None,
            requirements: strings(&["Experience with ML frameworks", "Team of 2-4 members"]),
            timeline: "Jan 15-17, 2025".to_string(),
            featured: true,
        },
        Lobby {
            id: "2".to_string(),
            title: "Web3 DeFi Protocol".to_string(),
            description: "Create innovative DeFi protocols using blockchain technology.".to_string(),
            category: "Web3".to_string(),
            difficulty: Difficulty::Expert,
            lobby_type: LobbyType::Hybrid,
            skills: strings(&["Solidity", "React", "Web3.js"]),
            participants: 28,
            max_participants: 40,
            prize: "₹75,000".to_string(),
            duration: "72 hours".to_string(),
            start_date: "2025-01-20".to_string(),
            end_date: "2025-01-23".to_string(),
            status: LobbyStatus::Upcoming,
            tags: strings(&["DeFi", "Blockchain", "Smart Contracts"]),
            organizer: "CryptoVentures".to_string(),
            host: "Alex Rivera".to_string(),
            location: Some("San Francisco, CA".to_string()),
            requirements: strings(&["Blockchain experience", "Solidity knowledge"]),
            timeline: "Jan 20-23, 2025".to_string(),
            featured: false,
        },
    ]
}
