//! Prompt construction for every rung of the strictness ladder and for
//! the repair rewrites.
//!
//! All prompt text is data; nothing here talks to a provider.

use crate::config::GenerationSettings;
use docent_core::{Prompt, SectionRequest, Strictness};

const ABSTRACT_PREVIEW_CHARS: usize = 1500;
const CONTEXT_PREVIEW_CHARS: usize = 1000;
const EXPAND_SOURCE_CHARS: usize = 3000;
const SIMILARITY_FIRST_CHARS: usize = 1800;
const SIMILARITY_SECOND_CHARS: usize = 2200;

const SCRIPT_SYSTEM: &str = "你是一个专业的科技视频撰稿助手。\n\
必须满足：\n\
- 纯中文输出（可在括号中保留必要术语的英文原文，例如 Transformer（Transformer））\n\
- 针对当前章节定制内容，禁止整体复述摘要或在不同章节重复相同句子\n\
- narration_parts 输出两段，每段≥600字，口语化且逻辑完整，不截断\n";

const JSON_ONLY_SYSTEM: &str = "严格只输出 JSON 对象，不得包含任何前后缀、空行、注释或 Markdown 代码块标记(例如 ``` 或 ```json)。\
输出必须是单个 JSON 对象，并严格以 { 开始、以 } 结束；若非 JSON 或含多余字符，将被判定为错误并立即丢弃并重新生成。\
请严格按以下最小结构与顺序输出：{\"title\":\"...\",\"bullets\":[\"...\",\"...\",\"...\"],\"narration_parts\":[\"段1\",\"段2\"]}";

const JSON_ONLY_SUFFIX: &str = "\n\n仅输出严格 JSON 对象，禁止任何 ``` 或 ```json 代码块标记，不要任何解释性文字，\
直接以 { 开始、以 } 结束，并确保有效 JSON。";

const QUALITY_SYSTEM: &str = "你是一名中文科普视频的资深撰稿人。严格按照以下质量要求重新生成完整 JSON（含 title, bullets, narration_parts）:\
1) narration_parts 必须两段且每段≥600字; 2) 仅使用中文，中文占比≥0.9，严禁英文字母; \
3) 严禁套话/模板化表达，必须结合给定上下文写出具体技术细节、实验设置/数据与关键结果; \
4) bullets 3-5条，覆盖不同要点; 5) 严禁 Markdown 代码块与任何解释性文字; 6) 仅输出 JSON，对象且以 { 开始、以 } 结束。";

const EXPAND_SYSTEM: &str = "你是专业的中文写作助手，输出必须为纯中文，内容完整连贯、避免重复。";

const SIMILARITY_SYSTEM: &str = "请改写为纯中文，避免与第一段重复，保持主题一致。";

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// The user message shared by every rung of the ladder.
pub fn section_user_prompt(request: &SectionRequest) -> String {
    let context = match request.retrieved_context() {
        Some(context) if !context.trim().is_empty() => preview(context, CONTEXT_PREVIEW_CHARS),
        _ => "无".to_string(),
    };

    format!(
        "请为以下章节生成脚本：\n\n\
         论文标题: {}\n\
         论文摘要: {}\n\n\
         章节标题: {}\n\
         章节摘要: {}\n\
         关键词: {}\n\n\
         检索到的相关内容: {}\n\n\
         请输出JSON：\n\
         {{\n  \"title\": \"章节标题\",\n  \"bullets\": [\"要点1\", \"要点2\", \"要点3\"],\n  \"narration_parts\": [\"第一段（≥600字）\", \"第二段（≥600字）\"]\n}}",
        request.paper_title(),
        preview(request.paper_abstract(), ABSTRACT_PREVIEW_CHARS),
        request.section_title(),
        request.section_summary(),
        request.keywords().join(", "),
        context,
    )
}

/// Build the prompt for one rung.
///
/// `reasons` are the failure reasons of the previous rung; only the
/// quality-strict rung quotes them back to the model.
pub fn rung_prompt(strictness: Strictness, request: &SectionRequest, reasons: &[String]) -> Prompt {
    let user = section_user_prompt(request);
    match strictness {
        Strictness::Normal => Prompt::new(SCRIPT_SYSTEM, user),
        Strictness::JsonOnly => Prompt::new(JSON_ONLY_SYSTEM, format!("{}{}", user, JSON_ONLY_SUFFIX)),
        Strictness::QualityStrict => Prompt::new(
            QUALITY_SYSTEM,
            format!(
                "{}\n\n请给出最终满足质量要求的 JSON。若上次失败原因: {}",
                user,
                reasons.join(",")
            ),
        ),
    }
}

/// Temperature for a rung; `attempt` is zero-based.
///
/// Only the normal rung escalates with the attempt index. Every value is
/// clamped to `[0, max_temperature]`.
pub fn rung_temperature(strictness: Strictness, attempt: usize, settings: &GenerationSettings) -> f32 {
    let raw = match strictness {
        Strictness::Normal => settings.base_temperature + settings.temperature_step * attempt as f32,
        Strictness::JsonOnly => settings.json_only_temperature,
        Strictness::QualityStrict => settings.rewrite_temperature,
    };
    raw.clamp(0.0, settings.max_temperature)
}

/// Token budget for a rung.
pub fn rung_max_tokens(strictness: Strictness, settings: &GenerationSettings) -> u32 {
    match strictness {
        Strictness::JsonOnly => settings.rewrite_max_tokens,
        Strictness::Normal | Strictness::QualityStrict => settings.max_tokens,
    }
}

/// Ask for a pure-Chinese rewrite of `content` of at least `min_len` characters.
pub fn expand_prompt(content: &str, topic: &str, min_len: usize) -> Prompt {
    Prompt::new(
        EXPAND_SYSTEM,
        format!(
            "请将以下内容改写为纯中文长段落，并扩展为不少于{}字，避免中英文混杂、避免逐句重复；\
             保留必要的专业术语的英文形式，但请用括号标注。例如 Transformer（Transformer）。\n\
             主题：{}\n原始内容：\n{}",
            min_len,
            topic,
            preview(content, EXPAND_SOURCE_CHARS)
        ),
    )
}

/// Ask for a rewrite of `second` that no longer repeats `first`.
pub fn similarity_prompt(first: &str, second: &str, topic: &str, min_len: usize) -> Prompt {
    Prompt::new(
        SIMILARITY_SYSTEM,
        format!(
            "主题：{}\n第一段：\n{}\n第二段（需改写避免重复，保持≥{}字）：\n{}",
            topic,
            preview(first, SIMILARITY_FIRST_CHARS),
            min_len,
            preview(second, SIMILARITY_SECOND_CHARS)
        ),
    )
}
