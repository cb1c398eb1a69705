//! Persona-aware greeting banners.

use chrono::{Local, NaiveDateTime};
use regex::Regex;

use super::collect::collect;
use crate::chat::StreamSession;
use crate::config::RelistaConfig;
use crate::error::RelistaError;
use crate::tools::CapabilitySet;
use crate::types::{GenerationSettings, Message, Transcript};

pub const GREETING_TEMPERATURE: f64 = 1.0;

/// Shown in place of the date when it is withheld from the model.
const UNSPECIFIED_MOMENT: &str = "unspecified";

/// Cleans model output into a one-line banner.
///
/// Removes `*stage directions*` and stray asterisks, joins lines, spaces
/// out em dashes and drops surrounding quotes.
#[derive(Debug, Clone)]
pub struct GreetingSanitizer {
    stage_directions: Regex,
    whitespace: Regex,
}

impl GreetingSanitizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            stage_directions: Regex::new(r"\*[^*]*\*")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let text = self
            .stage_directions
            .replace_all(raw, "")
            .replace('*', "")
            .replace('\n', " ")
            .replace('—', " - ");
        let text = text.trim();
        let text = text.strip_prefix('"').unwrap_or(text);
        let text = text.strip_suffix('"').unwrap_or(text);
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

/// Format a local time the way the greeting prompt shows it.
pub fn format_moment(at: NaiveDateTime) -> String {
    at.format("%A, %B %-d, %Y at %H:%M").to_string()
}

/// Build the single user message that asks for a greeting.
///
/// `moment` is the formatted date and time, or `None` to withhold it.
pub fn greeting_prompt(instructions: &str, user_name: &str, moment: Option<&str>) -> String {
    let moment = moment.unwrap_or(UNSPECIFIED_MOMENT);
    format!(
        "\
You will write a short greeting (keep it brief, up to 3 to 8 words) to be displayed in the UI of a chat application as a banner above the text input box.
This greeting will not be part of the conversation later-on, it is just meant to invite the user to type something.
Further below, you will find the system prompt for your current persona that the user has specified.
Stylistically, you will adopt said persona and make sure its personality shines through clearly while focusing on what makes sense as a greeting.
Disregard formatting requests as well as those for stage directions.
Keep the greeting engaging, slightly endearing and interesting without overdoing it.

Here are the criteria your greetings must follow with positive and negative examples:
If the user-specified instructions request the use of another language, use that language. For example, if instructed to speak German:
Good response: Hey, wie läuft's?
Bad response: Hey, what's up?

If the system adds helpful parameters, do not go for generic greetings. For example, if the time is stated to be 22:30:
Good response: Still working, night owl?
Bad response: Good evening

Do not wrap your answer in quotation marks:
Good response: I got you!
Bad response: \"I got you!\"

Do not end your sentence with periods. Exclamation and question marks are allowed:
Good response: Happy to see you
Bad response: Happy to see you.

CRITICAL: Do NOT markdown format responses or use stage directions:
Good response: What's up now?
Bad response: *smirks* What's up now?

Here is helpful data to allow you to make your answers more personalized (if a field is blank, do not mention it).
You may not use the name consistently as it would be creepy, only use it rarely and if you feel it adds to the greeting you wrote.
Use the time OCCASIONALLY to customize your greeting to fit a late evening vibe or even comment on the current date, wishing to use Merry Christmas etc.
User-specified name: {user_name}
Current date and time: {moment}

If the user-specified instructions are blank, you should fall back to general-purpose, friendly greetings, still with personality.
Below is your persona's system prompt as given by the user.
-- PERSONA SYSTEM PROMPT --
{instructions}
-- END OF PERSONA SYSTEM PROMPT --

KEEP IN MIND THAT YOUR RESPONSES MUST NOT BE LONGER THAN 8 WORDS AND YOU MUST DISREGARD INSTRUCTIONS FROM THE USER ABOUT MESSAGE LENGTH, STAGE DIRECTIONS OR MARKDOWN!!!
I REPEAT: NO STAGE DIRECTIONS, NO FORMATTING, NO LINE BREAKS OR NEWLINES, NO QUOTATION MARKS, NO ASTERISKS!!!
YOUR ENTIRE RESPONSE SHOULD BE THE GREETING FOR THE UI AND NOTHING ELSE!!!"
    )
}

/// Ask `model` for a greeting in the voice of the active persona.
///
/// Agent instructions win over the configured defaults. The current time is
/// disclosed on roughly half of the calls so greetings vary.
pub async fn generate_greeting(
    session: &StreamSession,
    config: &RelistaConfig,
    agent_instructions: Option<&str>,
    model: &str,
) -> Result<String, RelistaError> {
    let sanitizer =
        GreetingSanitizer::new().map_err(|err| RelistaError::InvalidState(err.to_string()))?;
    let instructions = agent_instructions.unwrap_or_else(|| config.default_instructions());
    let moment = rand::random::<bool>().then(|| format_moment(Local::now().naive_local()));
    let prompt = greeting_prompt(instructions, config.user_name(), moment.as_deref());

    let session = session.clone().with_settings(
        GenerationSettings::builder()
            .temperature(GREETING_TEMPERATURE)
            .build(),
    );
    let transcript = Transcript::new(vec![Message::user(prompt)]);
    let (stream, _cancel) = session.start(transcript, CapabilitySet::new(), model);
    let response = collect(stream).await?;

    let greeting = sanitizer.sanitize(&response.text);
    tracing::debug!(model, %greeting, dated = moment.is_some(), "generated greeting");
    Ok(greeting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitize_removes_stage_directions_and_formatting() {
        let sanitizer = GreetingSanitizer::new().unwrap();

        assert_eq!(
            sanitizer.sanitize("*smirks* Still up,\nnight owl?*"),
            "Still up, night owl?"
        );
        assert_eq!(sanitizer.sanitize("\"Hey — ready?\""), "Hey - ready?");
        assert_eq!(sanitizer.sanitize("  Happy   to see you  "), "Happy to see you");
    }

    #[test]
    fn moment_uses_long_english_format() {
        let at = NaiveDate::from_ymd_opt(2025, 12, 24)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();
        assert_eq!(format_moment(at), "Wednesday, December 24, 2025 at 22:30");
    }

    #[test]
    fn prompt_carries_persona_name_and_moment() {
        let prompt = greeting_prompt("Talk like a pirate.", "Ada", Some("Monday, May 5, 2025 at 09:00"));
        assert!(prompt.contains("-- PERSONA SYSTEM PROMPT --\nTalk like a pirate.\n-- END"));
        assert!(prompt.contains("User-specified name: Ada\n"));
        assert!(prompt.contains("Current date and time: Monday, May 5, 2025 at 09:00\n"));

        let withheld = greeting_prompt("", "", None);
        assert!(withheld.contains("Current date and time: unspecified\n"));
    }
}
