use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 项目描述文档：任意 JSON 对象，运行期间只读
///
/// 键按字典序存储，保证同一份输入每次序列化得到相同的文本。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectData {
    fields: Map<String, Value>,
}

impl ProjectData {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 解析 JSON 文本，顶层必须是对象
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// 字段的文本形式，缺失字段为空字符串
    pub fn field_text(&self, key: &str) -> String {
        self.get(key).map(value_text).unwrap_or_default()
    }

    /// 以两个空格缩进的 JSON 快照
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }
}

/// 插值用的文本形式：字符串取原文，null 为空，其余为紧凑 JSON
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
