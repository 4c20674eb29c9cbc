//! 模型输出拆分
//!
//! 拆分方式由操作类型决定，不根据内容推断；不校验每一项的内容。

use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("blank line pattern"));

/// 拆分方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// 每行一题
    Lines,
    /// 以空行分隔，一项可跨多行
    BlankLines,
    /// 整段文本作为一项
    Whole,
}

/// 将模型输出拆分为去除首尾空白的非空条目
pub fn split_response(text: &str, mode: SplitMode) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    let units: Vec<&str> = match mode {
        SplitMode::Lines => text.split('\n').collect(),
        SplitMode::BlankLines => BLANK_LINE.split(&text).collect(),
        SplitMode::Whole => vec![text.as_str()],
    };

    units
        .into_iter()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

/// `split_response` 的逆操作
pub fn join_units(units: &[String], mode: SplitMode) -> String {
    match mode {
        SplitMode::Lines => units.join("\n"),
        SplitMode::BlankLines | SplitMode::Whole => units.join("\n\n"),
    }
}
