use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AoaError, Result};
use crate::generator::template::{is_identifier, is_identifier_byte};
use crate::types::ProjectData;

const DEFAULT_CATALOG: &str = include_str!("default_catalog.toml");

/// 目录文件中的一条章节定义，instruction 可包含 `{field}` 引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "section", default)]
    sections: Vec<CatalogEntry>,
}

/// 与输入数据无关的章节目录定义
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDefinition {
    entries: Vec<CatalogEntry>,
}

impl CatalogDefinition {
    /// 内置的 AoA 章节目录
    pub fn standard() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| AoaError::config(format!("failed to parse section catalog: {}", e)))?;
        Self::from_entries(file.sections)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AoaError::config(format!(
                "failed to read section catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 校验章节标识符：必须是合法标识符且互不重复
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !is_identifier(&entry.id) {
                return Err(AoaError::config(format!(
                    "section id '{}' is not a valid identifier",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(AoaError::config(format!(
                    "duplicate section id '{}'",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// 所有章节引用的输入字段，按首次出现顺序去重
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for entry in &self.entries {
            for field in field_references(&entry.instruction) {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// 以项目数据插值，得到本次运行的章节目录
    pub fn build(&self, data: &ProjectData) -> SectionCatalog {
        let sections = self
            .entries
            .iter()
            .map(|entry| SectionSpec {
                id: entry.id.clone(),
                instruction: interpolate(&entry.instruction, data),
            })
            .collect();
        SectionCatalog { sections }
    }
}

/// 一个待生成的章节：标识符即模板中的占位符名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub id: String,
    pub instruction: String,
}

impl SectionSpec {
    pub fn new(id: &str, instruction: &str) -> Self {
        Self {
            id: id.to_string(),
            instruction: instruction.to_string(),
        }
    }
}

/// 有序的章节目录
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionCatalog {
    sections: Vec<SectionSpec>,
}

impl SectionCatalog {
    /// 内置目录插值后的结果
    pub fn standard(data: &ProjectData) -> Result<Self> {
        Ok(CatalogDefinition::standard()?.build(data))
    }

    /// 直接由章节构造，标识符必须唯一
    pub fn from_sections(sections: Vec<SectionSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = sections.iter().find(|s| !seen.insert(s.id.as_str())) {
            return Err(AoaError::config(format!(
                "duplicate section id '{}'",
                duplicate.id
            )));
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// instruction 中形如 `{field}` 的引用；`{{`/`}}` 不视为引用
pub fn field_references(instruction: &str) -> Vec<&str> {
    scan_references(instruction)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Field(name) => Some(name),
            Piece::Text(_) => None,
        })
        .collect()
}

/// 把 `{field}` 替换为字段文本，缺失字段替换为空字符串
pub fn interpolate(instruction: &str, data: &ProjectData) -> String {
    let mut output = String::with_capacity(instruction.len());
    for piece in scan_references(instruction) {
        match piece {
            Piece::Text(text) => output.push_str(text),
            Piece::Field(name) => output.push_str(&data.field_text(name)),
        }
    }
    output
}

enum Piece<'a> {
    Text(&'a str),
    Field(&'a str),
}

fn scan_references(instruction: &str) -> Vec<Piece<'_>> {
    let bytes = instruction.as_bytes();
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                i += 2;
            }
            b'{' => {
                let mut end = i + 1;
                while end < bytes.len() && is_identifier_byte(bytes[end], end == i + 1) {
                    end += 1;
                }
                if end > i + 1 && bytes.get(end) == Some(&b'}') {
                    if text_start < i {
                        pieces.push(Piece::Text(&instruction[text_start..i]));
                    }
                    pieces.push(Piece::Field(&instruction[i + 1..end]));
                    i = end + 1;
                    text_start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    if text_start < instruction.len() {
        pieces.push(Piece::Text(&instruction[text_start..]));
    }
    pieces
}
