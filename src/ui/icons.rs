//! Shared UI icons and emojis.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// Entities
pub static TEAM: Emoji<'_, '_> = Emoji("👥 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "");
pub static BOLT: Emoji<'_, '_> = Emoji("⚡ ", "");

// Board columns
pub static PENDING: Emoji<'_, '_> = Emoji("🕒 ", "[ ]");
pub static IN_PROGRESS: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static DONE: Emoji<'_, '_> = Emoji("✔️  ", "[x]");
