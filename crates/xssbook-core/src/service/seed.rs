//! Built-in persona accounts, posts and comments created on first start.

/// Static profile of a seeded persona.
#[derive(Debug, Clone, Copy)]
pub struct PersonaProfile {
    pub username: &'static str,
    pub name: &'static str,
    pub bio: &'static str,
}

impl PersonaProfile {
    pub fn email(&self) -> String {
        format!("{}@xssbook.local", self.username)
    }

    pub fn avatar(&self) -> String {
        format!(
            "https://ui-avatars.com/api/?name={}&background=1877f2&color=fff&size=200",
            self.name.replace(' ', "+")
        )
    }
}

/// Each persona is befriended with this many personas that follow it.
pub const SEED_FRIEND_SPAN: usize = 3;

pub const PERSONAS: &[PersonaProfile] = &[
    PersonaProfile {
        username: "alice_wonder",
        name: "Alice Wonderland",
        bio: "Curious explorer and adventure enthusiast",
    },
    PersonaProfile {
        username: "bob_builder",
        name: "Bob Builder",
        bio: "Can we fix it? Yes we can! Construction expert.",
    },
    PersonaProfile {
        username: "charlie_brown",
        name: "Charlie Brown",
        bio: "Good grief! Baseball and comic enthusiast.",
    },
    PersonaProfile {
        username: "diana_prince",
        name: "Diana Prince",
        bio: "Coffee lover ☕ Always ready for a chat!",
    },
    PersonaProfile {
        username: "ethan_hunt",
        name: "Ethan Hunt",
        bio: "Adventure seeker 🌍",
    },
    PersonaProfile {
        username: "fiona_gallagher",
        name: "Fiona Gallagher",
        bio: "Photographer 📸",
    },
    PersonaProfile {
        username: "george_lucas",
        name: "George Lucas",
        bio: "Tech enthusiast and passionate developer",
    },
    PersonaProfile {
        username: "hannah_baker",
        name: "Hannah Baker",
        bio: "Foodie 🍕",
    },
    PersonaProfile {
        username: "ivan_petrov",
        name: "Ivan Petrov",
        bio: "Music lover 🎵",
    },
    PersonaProfile {
        username: "julia_child",
        name: "Julia Child",
        bio: "Travel enthusiast ✈️",
    },
    PersonaProfile {
        username: "kevin_park",
        name: "Kevin Park",
        bio: "Fitness lover 💪",
    },
    PersonaProfile {
        username: "laura_palmer",
        name: "Laura Palmer",
        bio: "Book worm 📚",
    },
    PersonaProfile {
        username: "mike_ross",
        name: "Mike Ross",
        bio: "Gaming enthusiast 🎮",
    },
    PersonaProfile {
        username: "nina_simone",
        name: "Nina Simone",
        bio: "Nature lover 🌲",
    },
    PersonaProfile {
        username: "oscar_wilde",
        name: "Oscar Wilde",
        bio: "Love coding and learning new technologies!",
    },
];

/// A wall post created for a persona on first start.
#[derive(Debug, Clone, Copy)]
pub struct SeedPost {
    pub content: &'static str,
    pub image_url: &'static str,
}

/// Seeded posts, assigned to `PERSONAS` in order. Extra entries are unused.
pub const SEED_POSTS: &[SeedPost] = &[
    SeedPost {
        content: "Just learned about web security best practices!",
        image_url: "https://picsum.photos/800/600?random=1",
    },
    SeedPost {
        content: "Check out this cool website I found today!",
        image_url: "",
    },
    SeedPost {
        content: "Beautiful sunset today! Perfect weather for photography.",
        image_url: "https://picsum.photos/800/600?random=2",
    },
    SeedPost {
        content: "Love this new framework I'm learning. Very intuitive!",
        image_url: "",
    },
    SeedPost {
        content: "Coffee break time! ☕ Perfect way to recharge.",
        image_url: "https://picsum.photos/800/600?random=3",
    },
    SeedPost {
        content: "Working on a new project with some exciting features!",
        image_url: "https://picsum.photos/800/600?random=4",
    },
    SeedPost {
        content: "Amazing concert last night! The music was absolutely fantastic",
        image_url: "https://picsum.photos/800/600?random=5",
    },
    SeedPost {
        content: "Learning React and loving every minute of it! Such a powerful library.",
        image_url: "",
    },
    SeedPost {
        content: "Beach day! 🏖️ Perfect weather for swimming and relaxing.",
        image_url: "https://picsum.photos/800/600?random=6",
    },
    SeedPost {
        content: "Just finished reading an amazing book! 📚 Highly recommend it to everyone.",
        image_url: "https://picsum.photos/800/600?random=7",
    },
    SeedPost {
        content: "Cooking experiment today! Trying out a new recipe I found online.",
        image_url: "https://picsum.photos/800/600?random=8",
    },
    SeedPost {
        content: "Mountain hiking adventure! 🏔️ The view from the top was breathtaking.",
        image_url: "https://picsum.photos/800/600?random=9",
    },
    SeedPost {
        content: "Pet update: My cat learned a new trick today! So proud of her.",
        image_url: "https://picsum.photos/800/600?random=10",
    },
    SeedPost {
        content: "Game night with friends! 🎮 We played until 3 AM and it was worth it.",
        image_url: "https://picsum.photos/800/600?random=11",
    },
    SeedPost {
        content: "Travel plans are coming together! Europe here I come!",
        image_url: "https://picsum.photos/800/600?random=12",
    },
    SeedPost {
        content: "Art gallery visit today! 🎨 So much inspiration and creativity in one place.",
        image_url: "https://picsum.photos/800/600?random=13",
    },
    SeedPost {
        content: "Fitness journey update: Making great progress this month!",
        image_url: "",
    },
    SeedPost {
        content: "Garden update! 🌱 My tomatoes are finally ready to harvest.",
        image_url: "https://picsum.photos/800/600?random=14",
    },
    SeedPost {
        content: "Movie night: Watched a fantastic film! Highly recommend it.",
        image_url: "",
    },
    SeedPost {
        content: "Weekend farmers market! 🥕 Fresh vegetables and friendly vendors.",
        image_url: "https://picsum.photos/800/600?random=15",
    },
];

/// Each seeded post gets between one and this many comments.
pub const MAX_SEED_COMMENTS: usize = 3;

pub const SEED_COMMENTS: &[&str] = &[
    "Great post! Thanks for sharing.",
    "Love it! Very inspiring content.",
    "Awesome content! Keep it up.",
    "Thanks for sharing this! Really helpful.",
    "Amazing! Looking forward to more posts like this.",
    "Nice work! 👍",
    "Incredible post!",
    "Keep it up!",
    "So inspiring!",
    "Well said!",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_persona_usernames_unique() {
        let names: HashSet<_> = PERSONAS.iter().map(|p| p.username).collect();
        assert_eq!(names.len(), PERSONAS.len());
    }

    #[test]
    fn test_avatar_url_escapes_spaces() {
        let avatar = PERSONAS[0].avatar();
        assert!(avatar.contains("name=Alice+Wonderland"));
        assert!(!avatar.contains(' '));
    }

    #[test]
    fn test_seed_posts_cover_every_persona() {
        assert!(SEED_POSTS.len() >= PERSONAS.len());
        assert!(SEED_POSTS.iter().all(|p| !p.content.is_empty()));
        assert!(!SEED_COMMENTS.is_empty());
    }
}
