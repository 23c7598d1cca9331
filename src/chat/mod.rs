//! Chat-completion integration
//!
//! - `ChatProvider`: trait seam over the external chat-completion API
//! - `DeepSeekProvider`: production client for a DeepSeek-compatible endpoint
//! - reply formatting (markdown cleanup + plain variant for speech synthesis)
//! - `run_chat_turn`: the composite send-message operation

mod format;
mod provider;
mod turn;

pub use format::{format_reply, FormattedReply};
pub use provider::{ChatProvider, DeepSeekProvider};
pub use turn::{run_chat_turn, ChatTurn};

/// Persona instruction sent with every completion request. Constrains the
/// assistant to agricultural advice and to the client's inline-markup rules.
pub const SYSTEM_PROMPT: &str = "Anda adalah asisten pertanian PeTaniku. \
Hanya memberikan jawaban yang berhubungan dengan pertanian, perkebunan, dan \
kegiatan terkait petani. Tolong format jawaban dengan:\n\
1. Ganti **teks** dengan *teks* untuk bold\n\
2. Hindari penggunaan markdown seperti ### untuk heading\n\
3. Gunakan garis baru untuk pemisah bagian";
