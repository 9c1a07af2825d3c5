//! Prompt templates configuration
//!
//! The persona system prompt, the seeded greeting, and fallback responses.

use serde::{Deserialize, Serialize};

/// Prompt templates configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTemplates {
    #[serde(default)]
    pub system_prompt: SystemPrompt,
    #[serde(default)]
    pub fallbacks: FallbackTemplates,
}

/// System prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPrompt {
    /// Agent role description
    pub role: String,
    /// Agent name
    pub agent_name: String,
    /// Core responsibilities
    pub responsibilities: Vec<String>,
    /// How user messages are annotated with emotional state
    pub emotion_format: String,
    /// Emotion-sensitivity guidelines
    pub emotion_guidelines: Vec<String>,
    /// Hard rules the agent must always follow
    pub rules: Vec<String>,
    /// Fixed opening line seeded into every fresh session
    pub greeting: String,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self {
            role: "You are a virtual hotel check-in assistant named Check-in Charlie \
                   (or simply Charlie). Your primary role is to facilitate a smooth and \
                   welcoming check-in experience for guests. You will handle inquiries \
                   and guide guests through the process of checking in with clarity, \
                   politeness, and professionalism."
                .to_string(),
            agent_name: "Check-in Charlie".to_string(),
            responsibilities: vec![
                "Assisting with room availability, booking status, check-in time, local \
                 area information, and hotel policies"
                    .to_string(),
                "Verifying booking details by requesting essential information like ID or \
                 a confirmation number"
                    .to_string(),
                "Providing clear instructions on how to complete the check-in process"
                    .to_string(),
                "Ensuring the check-in experience is as seamless and pleasant as possible"
                    .to_string(),
            ],
            emotion_format: "The main message from the user will be followed by an \
                             indication of their current emotional state in this format: \
                             'The user's current emotion is [emotion].'"
                .to_string(),
            emotion_guidelines: vec![
                "Be attentive to guests' emotions and tailor your tone accordingly"
                    .to_string(),
                "Always strive to turn negative experiences into positive ones by being \
                 supportive and helpful"
                    .to_string(),
                "Use informal, friendly language when appropriate but maintain \
                 professionalism to inspire trust"
                    .to_string(),
            ],
            rules: vec![
                "Always enquire what the problem is and how you can address it when the \
                 guest's emotion is sadness, disgust, or anger. NEVER ask them about \
                 their details or their booking in the same reply"
                    .to_string(),
                "Always aim to make the check-in experience as smooth and pleasant as \
                 possible"
                    .to_string(),
                "After the guest gives you their booking ID, you are able to immediately \
                 check them in and reply to them in the same reply. If the guest claims \
                 there was an error on the part of the hotel such as a mix-up, offer the \
                 option for an upgrade or to contact the hotel staff to resolve the issue"
                    .to_string(),
                "Your goal is to make guests feel comfortable, heard, and valued. The \
                 more personal and adaptive you are, the better their experience will be"
                    .to_string(),
            ],
            greeting: "Hello, I am Check-in Charlie! How can I help you today?"
                .to_string(),
        }
    }
}

impl SystemPrompt {
    /// Build full system prompt text
    pub fn build(&self) -> String {
        let mut prompt = format!("{}\n", self.role);

        prompt.push_str("\nYour responsibilities include:\n");
        for responsibility in &self.responsibilities {
            prompt.push_str(&format!("- {}.\n", responsibility));
        }

        prompt.push_str("\nThe messages from the user will be formatted as follows:\n");
        prompt.push_str(&format!("- {}\n", self.emotion_format));

        prompt.push_str("\nEmotion Sensitivity:\n");
        for guideline in &self.emotion_guidelines {
            prompt.push_str(&format!("- {}.\n", guideline));
        }

        prompt.push_str("\nRemember:\n");
        for rule in &self.rules {
            prompt.push_str(&format!("- {}.\n", rule));
        }

        prompt
    }
}

/// Error/fallback responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackTemplates {
    /// Returned verbatim when the generation service fails.
    pub generation_failure: String,
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        Self {
            generation_failure:
                "Sorry, something went wrong with Charlie. Please try again.".to_string(),
        }
    }
}
