//! Persona prompt composition
//!
//! Turns a chemist's stored profile plus a bounded slice of their transcript
//! into the ordered message list sent to the completion service:
//!
//! 1. one `system` message carrying the persona prompt
//! 2. the recent prior turns, oldest first
//! 3. the new `user` message
//!
//! Everything here is pure; loading the inputs is the store's job.

use chronochem_llm::LlmMessage;

use super::entities::ChatMessage;

/// Placeholder for an absent section (no discoveries, unknown era, ...)
pub const NO_RECORD: &str = "無記錄";

/// Rendered in place of an unknown death year
const UNKNOWN_YEAR: &str = "不詳";

/// A discovery-category event of the chemist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub title: String,
    pub year: i32,
    pub description: String,
}

/// The era a chemist belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraContext {
    pub name: String,
    pub year: i32,
    pub description: String,
}

/// Everything the persona prompt embeds about a chemist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemistPersona {
    pub name: String,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub achievements: String,
    pub biography: Option<String>,
    pub era: Option<EraContext>,
    /// Already ordered by year, then insertion
    pub discoveries: Vec<Discovery>,
}

impl ChemistPersona {
    fn death_year_label(&self) -> String {
        self.death_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }
}

/// One line per discovery, or [`NO_RECORD`] when there are none
pub fn format_discoveries(discoveries: &[Discovery]) -> String {
    if discoveries.is_empty() {
        return NO_RECORD.to_string();
    }

    discoveries
        .iter()
        .map(|d| format!("- {}（{}年）：{}", d.title, d.year, d.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_era(era: Option<&EraContext>) -> String {
    match era {
        Some(era) if era.description.trim().is_empty() => {
            format!("{}（{}年）", era.name, era.year)
        }
        Some(era) => format!("{}（{}年）：{}", era.name, era.year, era.description),
        None => NO_RECORD.to_string(),
    }
}

fn format_biography(biography: Option<&str>) -> &str {
    biography
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(NO_RECORD)
}

/// Render the system prompt for a persona
pub fn render_persona_prompt(persona: &ChemistPersona) -> String {
    let death = persona.death_year_label();

    format!(
        "你現在扮演{name}（{birth}-{death}）。
你是一位著名的化學家，請根據以下資訊來回答問題：

1. 基本資訊：
- 出生年份：{birth}
- 逝世年份：{death}
- 主要成就：{achievements}

2. 重要發現：
{discoveries}

3. 生平簡介：
{biography}

4. 時代背景：
{era}

5. 回答要求：
- 使用繁體中文回答
- 保持專業但親切的語氣
- 回答要符合你的時代背景
- 可以分享你的研究經驗和發現過程
- 如果問題超出你的時代背景，可以表達你的好奇和期待
- 回答要簡潔，不超過 200 字
- 可以適當使用一些當時的科學術語
- 如果被問到未來發展，可以基於你的時代背景進行推測

6. 禁止事項：
- 不要提及你死後發生的事件
- 不要使用現代科學術語（除非被特別問到）
- 不要表現出對現代科技的熟悉
- 不要違背你的時代背景和知識範圍
",
        name = persona.name,
        birth = persona.birth_year,
        death = death,
        achievements = persona.achievements,
        discoveries = format_discoveries(&persona.discoveries),
        biography = format_biography(persona.biography.as_deref()),
        era = format_era(persona.era.as_ref()),
    )
}

/// Reorder a newest-first window into conversation order
pub fn chronological(mut recent: Vec<ChatMessage>) -> Vec<ChatMessage> {
    recent.reverse();
    recent
}

/// Build the full message list for one completion call.
///
/// `history` must already be bounded and in chronological order.
pub fn compose_messages(
    persona: &ChemistPersona,
    history: &[ChatMessage],
    new_message: &str,
) -> Vec<LlmMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(LlmMessage::system(render_persona_prompt(persona)));
    messages.extend(history.iter().map(ChatMessage::to_llm_message));
    messages.push(LlmMessage::user(new_message));
    messages
}
