//! User-facing texts. MarkdownV2 ones are pre-escaped.

use teloxide::utils::markdown::escape;

pub const GREETING: &str = "👋 Hi\\! I'm a bot that builds presentations on request\\.\n\
Try, for example:\n\n\
`/generate A presentation about AI`";

pub const NOT_UNDERSTOOD: &str = "Didn't quite get that 🙂\n\
Try, for example:\n\n\
`/generate A presentation about AI`";

pub const USAGE: &str = "Add a topic after the command: `/generate your topic`";

pub const COULD_NOT_CREATE: &str = "Could not create the presentation.";
pub const NOT_CREATED: &str = "The presentation was not created.";
pub const DOWNLOAD_FAILED: &str = "Download failed.";

pub fn generating(prompt: &str) -> String {
    format!(
        "Generating a presentation on: *{}*\\.\\.\\.\nThis takes 2\\-3 minutes ⏳",
        escape(prompt)
    )
}

pub fn caption(prompt: &str) -> String {
    format!("Done: {} 📈🎉\nCome back any time! 👨‍💻", prompt)
}

pub fn admin_notice(username: Option<&str>, user_id: Option<u64>) -> String {
    match (username, user_id) {
        (Some(name), _) => format!("📢 User @{} created a presentation", name),
        (None, Some(id)) => format!("📢 User {} created a presentation", id),
        (None, None) => "📢 Somebody created a presentation".to_string(),
    }
}
