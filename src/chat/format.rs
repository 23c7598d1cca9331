/// An assistant reply in the two shapes the client needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReply {
    /// Reply with heading markup stripped and `**bold**` normalized to `*bold*`
    pub formatted: String,

    /// Formatted reply with all emphasis markers removed, for TTS playback
    pub plain: String,
}

/// Post-process a raw completion: models ignore the persona's markup rules
/// often enough that the cleanup has to happen here.
pub fn format_reply(raw: &str) -> FormattedReply {
    let formatted = raw.replace("###", "").replace("**", "*");
    let plain = formatted.replace('*', "");
    FormattedReply { formatted, plain }
}
