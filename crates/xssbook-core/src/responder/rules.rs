//! Pattern tables for the response engine.
//!
//! Rules live in one ordered list, built once on first use. The list is
//! sorted by category priority (greeting, compliment, support, topic) and
//! the order of rules inside a category is significant: the first rule
//! whose vocabulary matches wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Rule categories in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCategory {
    Greeting,
    Compliment,
    Support,
    Topic,
    Question,
    TimeOfDay,
    Fallback,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Greeting => write!(f, "greeting"),
            RuleCategory::Compliment => write!(f, "compliment"),
            RuleCategory::Support => write!(f, "support"),
            RuleCategory::Topic => write!(f, "topic"),
            RuleCategory::Question => write!(f, "question"),
            RuleCategory::TimeOfDay => write!(f, "time_of_day"),
            RuleCategory::Fallback => write!(f, "fallback"),
        }
    }
}

/// Local time bucket used for time-of-day replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Morning is `[5, 12)`, afternoon `[12, 17)`, everything else evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn replies(self) -> &'static [&'static str] {
        match self {
            TimeOfDay::Morning => MORNING_REPLIES,
            TimeOfDay::Afternoon => AFTERNOON_REPLIES,
            TimeOfDay::Evening => EVENING_REPLIES,
        }
    }
}

/// A vocabulary predicate paired with its candidate replies.
#[derive(Debug)]
pub struct PatternRule {
    pub category: RuleCategory,
    /// Short name for logs, e.g. `"technology"`.
    pub label: &'static str,
    pattern: Regex,
    pub replies: &'static [&'static str],
}

impl PatternRule {
    fn new(
        category: RuleCategory,
        label: &'static str,
        vocabulary: &[&str],
        replies: &'static [&'static str],
    ) -> Self {
        let alternation = vocabulary
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b({alternation})\b"))
            .expect("rule vocabulary is escaped and always compiles");
        Self {
            category,
            label,
            pattern,
            replies,
        }
    }

    /// Whether any vocabulary word occurs in `text` on word boundaries.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(build_rules);

/// All vocabulary rules in evaluation order.
pub fn pattern_rules() -> &'static [PatternRule] {
    &PATTERN_RULES
}

/// First rule matching an already-normalized message.
pub fn first_match(normalized: &str) -> Option<&'static PatternRule> {
    pattern_rules().iter().find(|rule| rule.matches(normalized))
}

/// Every reply a given category can produce (before name personalization).
pub fn candidates(category: RuleCategory) -> Vec<&'static str> {
    match category {
        RuleCategory::Question => QUESTION_REPLIES.to_vec(),
        RuleCategory::Fallback => FALLBACK_REPLIES.to_vec(),
        RuleCategory::TimeOfDay => [MORNING_REPLIES, AFTERNOON_REPLIES, EVENING_REPLIES].concat(),
        vocabulary => pattern_rules()
            .iter()
            .filter(|rule| rule.category == vocabulary)
            .flat_map(|rule| rule.replies.iter().copied())
            .collect(),
    }
}

fn build_rules() -> Vec<PatternRule> {
    use RuleCategory::{Compliment, Greeting, Support, Topic};

    vec![
        PatternRule::new(
            Greeting,
            "salutation",
            &[
                "hi",
                "hello",
                "hey",
                "greetings",
                "good morning",
                "good afternoon",
                "good evening",
            ],
            SALUTATION_REPLIES,
        ),
        PatternRule::new(
            Greeting,
            "wellbeing",
            &["how are you", "how's it going", "what's up", "whats up"],
            WELLBEING_REPLIES,
        ),
        PatternRule::new(
            Compliment,
            "praise",
            &[
                "nice",
                "good",
                "great",
                "awesome",
                "amazing",
                "cool",
                "sweet",
                "perfect",
                "excellent",
                "wonderful",
            ],
            COMPLIMENT_REPLIES,
        ),
        PatternRule::new(
            Support,
            "distress",
            &[
                "sad",
                "tired",
                "stressed",
                "worried",
                "anxious",
                "difficult",
                "hard",
                "problem",
                "issue",
            ],
            SUPPORT_REPLIES,
        ),
        PatternRule::new(
            Topic,
            "technology",
            &[
                "social media",
                "facebook",
                "instagram",
                "twitter",
                "tech",
                "technology",
                "app",
                "website",
            ],
            TECHNOLOGY_REPLIES,
        ),
        PatternRule::new(
            Topic,
            "hobbies",
            &[
                "hobby",
                "hobbies",
                "interest",
                "love",
                "enjoy",
                "like",
                "favorite",
                "music",
                "movies",
                "books",
                "sports",
                "games",
            ],
            HOBBY_REPLIES,
        ),
        PatternRule::new(
            Topic,
            "work",
            &[
                "work",
                "job",
                "career",
                "office",
                "business",
                "project",
                "study",
                "school",
                "college",
                "university",
            ],
            WORK_REPLIES,
        ),
        PatternRule::new(
            Topic,
            "food",
            &[
                "food",
                "eat",
                "cooking",
                "restaurant",
                "recipe",
                "coffee",
                "drink",
                "travel",
                "vacation",
                "weekend",
            ],
            FOOD_REPLIES,
        ),
        PatternRule::new(
            Topic,
            "weather",
            &[
                "weather",
                "hot",
                "cold",
                "rain",
                "sunny",
                "cloudy",
                "beautiful",
                "nice",
                "day",
                "today",
                "tomorrow",
            ],
            WEATHER_REPLIES,
        ),
    ]
}

// ---------------------------------------------------------------------------
// Candidate replies
// ---------------------------------------------------------------------------

const SALUTATION_REPLIES: &[&str] = &[
    "Hey there! 😊 How's your day going?",
    "Hello! Great to see you online! What's up?",
    "Hi! Hope you're having an awesome day!",
    "Hey! What brings you here today?",
    "Hello friend! How are you doing?",
    "Hi there! Nice to chat with you!",
    "Hey! What's new with you?",
    "Hello! Ready for some interesting conversation?",
    "Hey! Good to see you here! 😊",
    "Hi! How are you doing today?",
];

const WELLBEING_REPLIES: &[&str] = &[
    "I'm doing great, thanks for asking! How about you?",
    "Pretty good! Just enjoying some social networking time 😄",
    "All good here! What's been keeping you busy?",
    "I'm fantastic! Hope you're having a wonderful day too!",
    "Doing well! Any exciting plans for today?",
    "Great! Just chatting with friends online. You?",
    "I'm good! What's your favorite thing about XSSBook?",
    "Awesome! How are you doing?",
    "I'm great! And you?",
];

const COMPLIMENT_REPLIES: &[&str] = &[
    "Thank you! That's so kind of you to say! 😊",
    "Aww, you're too sweet! Thanks!",
    "I appreciate that! You seem pretty awesome yourself!",
    "That means a lot coming from you! Thanks!",
    "You're so nice! Thank you for the kind words!",
    "Thanks! You just made my day brighter! ✨",
    "That's really thoughtful of you to say!",
    "Thank you so much! That's really nice!",
    "Thanks! You're sweet too!",
];

const SUPPORT_REPLIES: &[&str] = &[
    "I'm sorry to hear that. Want to talk about what's bothering you?",
    "That sounds tough. Sometimes it helps just to share what's on your mind.",
    "I understand that can be challenging. You're not alone in feeling this way.",
    "Difficult times happen to everyone. What usually helps you feel better?",
    "That must be stressful. Have you tried any relaxation techniques?",
    "I hear you. Sometimes talking through problems can provide clarity.",
    "It's okay to feel overwhelmed sometimes. Take it one step at a time.",
    "I'm here if you need to talk about it.",
    "Sorry to hear that! Want to chat about what's going on?",
];

const TECHNOLOGY_REPLIES: &[&str] = &[
    "I love discussing technology! Social media has really changed how we connect.",
    "Tech is fascinating! What's your favorite social platform?",
    "XSSBook is pretty cool, right? I enjoy the community here!",
    "Social media can be both amazing and overwhelming sometimes.",
    "Technology keeps evolving so fast! It's exciting to be part of it.",
    "Yeah, social media is great for connecting with people!",
    "I agree! Technology is amazing and keeps advancing!",
];

const HOBBY_REPLIES: &[&str] = &[
    "That sounds interesting! I love hearing about people's passions.",
    "Hobbies are so important for a balanced life! What do you enjoy most?",
    "I'm into photography and reading. What about you?",
    "Music is life! What genre do you listen to?",
    "Movies are great for unwinding. Any recent favorites?",
    "Sports can be so exciting! Do you play or just watch?",
    "Gaming is awesome! I love both classic and modern games.",
    "Reading opens up whole new worlds! Any book recommendations?",
    "That's a cool hobby! I'd love to hear more about it.",
    "Nice! I share similar interests!",
];

const WORK_REPLIES: &[&str] = &[
    "Work-life balance is so important! How do you manage it?",
    "Career growth is exciting! What field are you in?",
    "Projects can be challenging but rewarding. What are you working on?",
    "Education is a lifelong journey! Always something new to learn.",
    "School days... some of the best memories! What did you study?",
    "Professional development is key in today's world.",
    "Office culture varies so much between companies!",
    "Work sounds interesting! Tell me more about what you do.",
    "Career talk! I'd love to hear about your experiences!",
];

const FOOD_REPLIES: &[&str] = &[
    "Food is one of life's greatest pleasures! What's your favorite cuisine?",
    "I love trying new recipes! Any cooking tips?",
    "Coffee is essential for my day! Are you a coffee person too?",
    "Travel broadens the mind! Any dream destinations?",
    "Weekends are for recharging! How do you like to spend yours?",
    "Good food and good company make the best combinations!",
    "Cooking can be so therapeutic and creative!",
    "Restaurant discoveries are always exciting!",
    "I love food discussions! What's your favorite type of cuisine?",
    "Yummy! What's your favorite dish to cook?",
];

const WEATHER_REPLIES: &[&str] = &[
    "Weather definitely affects the mood! How's it where you are?",
    "Beautiful days are perfect for outdoor activities!",
    "I love when the weather is just right - not too hot, not too cold.",
    "Rainy days are perfect for staying in and chatting online!",
    "Sunny weather always puts me in a good mood! ☀️",
    "Weather can be so unpredictable these days!",
    "Hope you're having a lovely day regardless of the weather!",
    "Nice weather we're having! How's it where you are?",
    "Great day! How's the weather there?",
];

pub(crate) const QUESTION_REPLIES: &[&str] = &[
    "That's a great question! What do you think about it?",
    "Interesting point! I'd love to hear your perspective on this.",
    "Hmm, that makes me think... What's your take?",
    "Good question! It really depends on the situation, don't you think?",
    "I've been wondering about that too! Any insights?",
    "That's thought-provoking! How would you approach it?",
    "Great minds think alike! What's your opinion?",
    "That's a good question! I'm curious about your thoughts.",
    "Interesting! What do you think about it?",
];

pub(crate) const FALLBACK_REPLIES: &[&str] = &[
    "That's interesting! Tell me more about that.",
    "I see what you mean! What made you think of that?",
    "Cool! I'd love to hear more about your thoughts on this.",
    "That sounds intriguing! Can you elaborate?",
    "Interesting perspective! What's your experience with that?",
    "I hadn't thought of it that way before! Thanks for sharing.",
    "That's a unique point of view! What else do you think about it?",
    "Thanks for sharing that! It's always nice to learn something new.",
    "I appreciate you telling me that! What else is on your mind?",
    "That's pretty cool! Any other thoughts you'd like to share?",
    "Fascinating! I enjoy our conversations.",
    "Thanks for that insight! You always have interesting things to say.",
    "I like how you think! What else would you like to chat about?",
    "That's thoughtful! I value our discussions.",
    "Interesting! Tell me more about your thoughts on that!",
    "Cool! What else is new with you?",
    "Nice! Any other thoughts you'd like to share?",
];

const MORNING_REPLIES: &[&str] = &[
    "Good morning! Hope you have a fantastic day ahead! ☀️",
    "Morning! Ready to tackle the day?",
    "Good morning! What's the plan for today?",
    "Good morning! Hope you're having a great start to your day! ☀️",
];

const AFTERNOON_REPLIES: &[&str] = &[
    "Good afternoon! How's your day going so far?",
    "Afternoon! Hope you're having a productive day!",
    "Good afternoon! Taking a break from the day?",
    "Good afternoon! How has your day been treating you?",
];

const EVENING_REPLIES: &[&str] = &[
    "Good evening! How was your day?",
    "Evening! Time to unwind and relax!",
    "Good evening! What's the highlight of your day?",
    "Good evening! Hope you had a wonderful day!",
];

pub(crate) const CONVERSATION_STARTERS: &[&str] = &[
    "Hey! How's everything going with you?",
    "Hi there! What's been keeping you busy lately?",
    "Hello! Nice to see you on XSSBook! What's new?",
    "Hey! Hope you're having a great day! What's up?",
    "Hi! Just wanted to say hello and see how you're doing!",
    "Hello! What's the most interesting thing that happened to you today?",
    "Hey! Any exciting plans for the weekend?",
    "Hey! How are you doing today?",
    "Hi! What's new with you lately?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_sorted_by_category_priority() {
        let categories: Vec<RuleCategory> = pattern_rules().iter().map(|r| r.category).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn test_topic_rule_order() {
        let labels: Vec<&str> = pattern_rules()
            .iter()
            .filter(|r| r.category == RuleCategory::Topic)
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, ["technology", "hobbies", "work", "food", "weather"]);
    }

    #[test]
    fn test_every_table_nonempty() {
        for rule in pattern_rules() {
            assert!(!rule.replies.is_empty(), "rule '{}' has no replies", rule.label);
        }
        assert!(!QUESTION_REPLIES.is_empty());
        assert!(!FALLBACK_REPLIES.is_empty());
        assert!(!CONVERSATION_STARTERS.is_empty());
        for bucket in [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening] {
            assert!(!bucket.replies().is_empty());
        }
    }

    #[test]
    fn test_word_boundaries() {
        // "hi" inside "this" or "which" is not a greeting.
        assert!(first_match("this is which").is_none());
        // "app" must not fire on "happy".
        assert!(first_match("happy").is_none());
        assert_eq!(first_match("hi there").unwrap().label, "salutation");
    }

    #[test]
    fn test_matches_anywhere_in_message() {
        let rule = first_match("so anyway, hello!").unwrap();
        assert_eq!(rule.category, RuleCategory::Greeting);
    }

    #[test]
    fn test_multi_word_and_apostrophe_vocabulary() {
        assert_eq!(first_match("so how's it going").unwrap().label, "wellbeing");
        assert_eq!(first_match("i use social media daily").unwrap().label, "technology");
    }

    #[test]
    fn test_compliment_beats_weather_for_nice() {
        // "nice" is in both vocabularies; compliments are evaluated first.
        assert_eq!(first_match("nice").unwrap().category, RuleCategory::Compliment);
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Evening);
    }

    #[test]
    fn test_candidates_for_vocabulary_category() {
        let greetings = candidates(RuleCategory::Greeting);
        assert!(greetings.contains(&"Hi! How are you doing today?"));
        assert!(greetings.contains(&"I'm great! And you?"));
        assert!(!greetings.contains(&"Nice! I share similar interests!"));
    }
}
