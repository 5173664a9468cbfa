//! 报告模板：一次性切分为文本片段与 `{{name}}` 占位符片段
//!
//! 所有替换都作用在解析时确定的占位符上，替换进去的文本不会再被扫描，
//! 因此生成内容里出现的 `{{x}}` 会原样保留。

use std::fmt::{Display, Formatter};

use crate::types::ProjectData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut segments = Vec::new();
        let mut text_start = 0;
        let mut i = 0;

        while i + 1 < bytes.len() {
            if bytes[i] == b'{'
                && bytes[i + 1] == b'{'
                && let Some(token_end) = match_placeholder(bytes, i + 2)
            {
                if text_start < i {
                    segments.push(Segment::Text(source[text_start..i].to_string()));
                }
                segments.push(Segment::Placeholder(
                    source[i + 2..token_end - 2].to_string(),
                ));
                i = token_end;
                text_start = i;
                continue;
            }
            i += 1;
        }

        if text_start < source.len() {
            segments.push(Segment::Text(source[text_start..].to_string()));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 尚未填充的占位符名称，按首次出现顺序去重
    pub fn placeholder_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    pub fn contains_placeholder(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(n) if n == name))
    }

    /// 用 `value` 填充所有名为 `name` 的占位符，返回填充的个数
    pub fn fill(&mut self, name: &str, value: &str) -> usize {
        let mut filled = 0;
        for segment in self.segments.iter_mut() {
            if matches!(segment, Segment::Placeholder(n) if n == name) {
                *segment = Segment::Text(value.to_string());
                filled += 1;
            }
        }
        filled
    }

    /// 拼接成最终文本，未填充的占位符原样输出
    pub fn render(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    output.push_str("{{");
                    output.push_str(name);
                    output.push_str("}}");
                }
            }
        }
        output
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// 从 `start` 开始匹配 `identifier}}`，成功时返回 token 结束位置
fn match_placeholder(bytes: &[u8], start: usize) -> Option<usize> {
    let mut end = start;
    while end < bytes.len() && is_identifier_byte(bytes[end], end == start) {
        end += 1;
    }
    if end == start {
        return None;
    }
    match (bytes.get(end), bytes.get(end + 1)) {
        (Some(b'}'), Some(b'}')) => Some(end + 2),
        _ => None,
    }
}

pub(crate) fn is_identifier_byte(byte: u8, first: bool) -> bool {
    byte == b'_' || byte.is_ascii_alphabetic() || (!first && byte.is_ascii_digit())
}

/// 是否为合法的占位符/章节标识符
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .enumerate()
            .all(|(i, byte)| is_identifier_byte(byte, i == 0))
}

/// 字面字段阶段：以项目字段值填充对应占位符，缺失字段填充为空字符串
pub fn apply_literals(template: &mut Template, data: &ProjectData, fields: &[String]) -> usize {
    fields
        .iter()
        .map(|field| template.fill(field, &data.field_text(field)))
        .sum()
}

/// 对模板文本执行字面字段阶段
pub fn render_literals(source: &str, data: &ProjectData, fields: &[String]) -> String {
    let mut template = Template::parse(source);
    apply_literals(&mut template, data, fields);
    template.render()
}
