//! Bundled stand-in article, glossary and demo history entries

use crate::document::{DocumentId, DocumentKind, Paragraph, ParagraphKind};
use crate::history::DocumentSummary;
use crate::lookup::LookupEntry;

/// Id of the document shown on first launch
pub const DEFAULT_DOCUMENT_ID: &str = "demo-llm-2024";
pub const DEFAULT_DOCUMENT_NAME: &str = "large_language_models.pdf";

/// Demo documents whose content is the stand-in article
pub const DEMO_IDS: [&str; 5] = [
    "demo-llm-2024",
    "demo-transformer",
    "demo-nlp",
    "demo-rl",
    "demo-gpt4",
];

pub fn is_demo_id(id: &DocumentId) -> bool {
    DEMO_IDS.contains(&id.as_str())
}

const ARTICLE: &[(ParagraphKind, &str, &str)] = &[
    (
        ParagraphKind::Title,
        "Large Language Models: Capabilities, Limitations and Open Problems",
        "大语言模型：能力、局限与开放问题",
    ),
    (
        ParagraphKind::Authors,
        "Wei Chen, Laura Martinez, Kenji Sato",
        "陈伟，劳拉·马丁内斯，佐藤健二",
    ),
    (
        ParagraphKind::Affiliation,
        "Institute for Computational Linguistics",
        "计算语言学研究所",
    ),
    (ParagraphKind::AbstractLabel, "Abstract", "摘要"),
    (
        ParagraphKind::Abstract,
        "Large language models trained on web-scale corpora have shown remarkable fluency across many tasks. This survey reviews the transformer architecture behind them, the pretraining and fine-tuning pipeline, and the evaluation practices used to measure progress.",
        "在网络规模语料库上训练的大语言模型在众多任务中表现出惊人的流畅性。本综述回顾了其背后的 Transformer 架构、预训练与微调流程，以及用于衡量进展的评估方法。",
    ),
    (ParagraphKind::KeywordsLabel, "Keywords", "关键词"),
    (
        ParagraphKind::Keywords,
        "transformer; attention; pretraining; alignment; evaluation",
        "Transformer；注意力；预训练；对齐；评估",
    ),
    (ParagraphKind::Section, "1 Introduction", "1 引言"),
    (
        ParagraphKind::Body,
        "Language modeling is the task of predicting the next token given a context. Scaling model parameters and training data has turned this simple objective into a general-purpose interface for reasoning, translation and code generation.",
        "语言建模是在给定上下文的情况下预测下一个词元的任务。扩大模型参数与训练数据的规模，使这一简单目标成为推理、翻译与代码生成的通用接口。",
    ),
    (
        ParagraphKind::Body,
        "Despite this progress, models still hallucinate facts, struggle with long-horizon planning and remain sensitive to small changes in the prompt. Understanding these limitations is essential for deploying them responsibly.",
        "尽管取得了这些进展，模型仍会产生事实性幻觉，难以进行长程规划，并且对提示词的细微变化十分敏感。理解这些局限对于负责任地部署模型至关重要。",
    ),
    (ParagraphKind::Section, "2 Architecture", "2 架构"),
    (
        ParagraphKind::Body,
        "The transformer replaces recurrence with self-attention, letting every position attend to every other position in a single layer. Multi-head attention projects queries, keys and values into several subspaces that are learned jointly.",
        "Transformer 以自注意力取代循环结构，使每个位置都能在单层中关注其他所有位置。多头注意力将查询、键和值投影到若干个联合学习的子空间中。",
    ),
    (
        ParagraphKind::Body,
        "Positional encodings inject order information, since attention itself is permutation invariant. Residual connections and layer normalization keep optimization stable as depth grows.",
        "由于注意力本身具有置换不变性，位置编码被用来注入顺序信息。随着网络加深，残差连接与层归一化保证了优化过程的稳定。",
    ),
    (ParagraphKind::Section, "3 Training and Alignment", "3 训练与对齐"),
    (
        ParagraphKind::Body,
        "Pretraining on unlabeled text is followed by supervised fine-tuning on curated instructions. Reinforcement learning from human feedback then aligns the model with human preferences using a learned reward model.",
        "在无标注文本上预训练之后，模型会在精选指令数据上进行监督微调。随后，基于人类反馈的强化学习借助习得的奖励模型使模型与人类偏好对齐。",
    ),
    (
        ParagraphKind::Body,
        "Evaluation remains an open problem: static benchmarks saturate quickly and may leak into training data, so recent work favors held-out tasks and human judgement.",
        "评估仍是一个开放问题：静态基准很快趋于饱和，并可能泄漏到训练数据中，因此近期工作更倾向于使用留出任务和人工评判。",
    ),
];

/// The article shown for demo documents and as the initial document.
/// Every paragraph carries its final translation.
pub fn stand_in_article() -> Vec<Paragraph> {
    ARTICLE
        .iter()
        .enumerate()
        .map(|(idx, (kind, source, target))| {
            Paragraph::new(idx as u32 + 1, *kind, *source, *target)
        })
        .collect()
}

fn entry(phonetic: &str, pos: &str, translation: &str, example: Option<&str>) -> LookupEntry {
    LookupEntry {
        phonetic: phonetic.to_string(),
        part_of_speech: pos.to_string(),
        translation: translation.to_string(),
        example: example.map(str::to_string),
    }
}

/// Terms from the stand-in article
pub fn glossary() -> Vec<(&'static str, LookupEntry)> {
    vec![
        (
            "transformer",
            entry(
                "/trænsˈfɔːmə(r)/",
                "n.",
                "Transformer 模型；变换器",
                Some("The transformer replaces recurrence with self-attention."),
            ),
        ),
        (
            "attention",
            entry(
                "/əˈtenʃn/",
                "n.",
                "注意力",
                Some("Multi-head attention projects queries, keys and values."),
            ),
        ),
        ("self-attention", entry("/self əˈtenʃn/", "n.", "自注意力", None)),
        (
            "language model",
            entry(
                "/ˈlæŋɡwɪdʒ ˈmɒdl/",
                "n.",
                "语言模型",
                Some("Language modeling predicts the next token."),
            ),
        ),
        ("large language models", entry("", "n.", "大语言模型", None)),
        ("corpora", entry("/ˈkɔːpərə/", "n.", "语料库（复数）", None)),
        ("corpus", entry("/ˈkɔːpəs/", "n.", "语料库", None)),
        (
            "token",
            entry("/ˈtəʊkən/", "n.", "词元；标记", Some("Predicting the next token given a context.")),
        ),
        ("pretraining", entry("/priːˈtreɪnɪŋ/", "n.", "预训练", None)),
        ("fine-tuning", entry("/faɪn ˈtjuːnɪŋ/", "n.", "微调", None)),
        (
            "hallucinate",
            entry("/həˈluːsɪneɪt/", "v.", "产生幻觉；编造", Some("Models still hallucinate facts.")),
        ),
        ("alignment", entry("/əˈlaɪnmənt/", "n.", "对齐", None)),
        ("prompt", entry("/prɒmpt/", "n.", "提示词", None)),
        ("benchmark", entry("/ˈbentʃmɑːk/", "n.", "基准测试", None)),
        ("benchmarks", entry("/ˈbentʃmɑːks/", "n.", "基准测试（复数）", None)),
        ("recurrence", entry("/rɪˈkʌrəns/", "n.", "循环；递归", None)),
        ("permutation", entry("/ˌpɜːmjuˈteɪʃn/", "n.", "置换；排列", None)),
        ("invariant", entry("/ɪnˈveəriənt/", "adj.", "不变的", None)),
        ("residual", entry("/rɪˈzɪdjuəl/", "adj.", "残差的", None)),
        ("normalization", entry("/ˌnɔːməlaɪˈzeɪʃn/", "n.", "归一化", None)),
        ("reward model", entry("/rɪˈwɔːd ˈmɒdl/", "n.", "奖励模型", None)),
        (
            "reinforcement learning",
            entry("/ˌriːɪnˈfɔːsmənt ˈlɜːnɪŋ/", "n.", "强化学习", None),
        ),
        ("survey", entry("/ˈsɜːveɪ/", "n.", "综述；调查", None)),
        ("remarkable", entry("/rɪˈmɑːkəbl/", "adj.", "显著的；非凡的", None)),
        ("fluency", entry("/ˈfluːənsi/", "n.", "流畅性", None)),
    ]
}

/// Seed entries for a fresh history, dated relative to `now_millis`
pub fn demo_history(now_millis: i64) -> Vec<DocumentSummary> {
    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    use DocumentKind::{Pdf, Txt};
    // (id, name, age, size, kind, pages, paragraphs)
    let demos = [
        ("demo-llm-2024", DEFAULT_DOCUMENT_NAME, 25 * MINUTE, 1_248_312, Pdf, 8, 27),
        ("demo-transformer", "attention_is_all_you_need.pdf", 4 * HOUR, 876_544, Pdf, 11, 34),
        ("demo-nlp", "introduction_to_nlp.txt", 28 * HOUR, 42_800, Txt, 4, 18),
        ("demo-rl", "reinforcement_learning_survey.pdf", 3 * DAY, 2_104_832, Pdf, 18, 45),
        ("demo-gpt4", "gpt4_technical_report.pdf", 7 * DAY, 3_564_032, Pdf, 24, 61),
    ];
    demos
        .into_iter()
        .map(|(id, name, age, size, kind, pages, paragraphs)| DocumentSummary {
            id: DocumentId::new(id),
            name: name.to_string(),
            uploaded_at: now_millis - age,
            size,
            kind,
            page_count: pages,
            paragraph_count: paragraphs,
            is_demo: true,
        })
        .collect()
}
