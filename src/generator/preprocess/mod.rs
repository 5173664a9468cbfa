use std::path::Path;

use tokio::fs::read_to_string;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AoaError, Result};
use crate::generator::catalog::CatalogDefinition;
use crate::types::ProjectData;

/// 加载阶段的产物，生成开始前所有文件都已读取并关闭
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub template_source: String,
    pub data: ProjectData,
    pub catalog: CatalogDefinition,
}

/// 读取模板、输入文档与章节目录
pub async fn execute(config: &Config) -> Result<RunInputs> {
    let template_path = config.template_file();
    let input_path = config.input_file();

    debug!(template = %template_path.display(), input = %input_path.display(), "loading inputs");

    let template_source = load_template(&template_path).await?;
    let data = load_input(&input_path).await?;
    let catalog = match config.catalog_file() {
        Some(path) => {
            debug!(catalog = %path.display(), "loading section catalog");
            CatalogDefinition::from_file(&path)?
        }
        None => CatalogDefinition::standard()?,
    };

    let missing = missing_fields(&catalog, &data);
    if !missing.is_empty() {
        if config.strict_fields {
            return Err(AoaError::input(
                input_path,
                format!("missing required fields: {}", missing.join(", ")),
            ));
        }
        warn!(
            fields = %missing.join(", "),
            "input document is missing referenced fields, they will render as empty text"
        );
    }

    Ok(RunInputs {
        template_source,
        data,
        catalog,
    })
}

pub async fn load_template(path: &Path) -> Result<String> {
    read_to_string(path)
        .await
        .map_err(|e| AoaError::input(path, format!("failed to read template: {}", e)))
}

pub async fn load_input(path: &Path) -> Result<ProjectData> {
    let content = read_to_string(path)
        .await
        .map_err(|e| AoaError::input(path, format!("failed to read input document: {}", e)))?;
    ProjectData::from_json_str(&content)
        .map_err(|e| AoaError::input(path, format!("input document is not a JSON object: {}", e)))
}

/// 目录引用了但输入文档中不存在的字段
pub fn missing_fields(catalog: &CatalogDefinition, data: &ProjectData) -> Vec<String> {
    catalog
        .referenced_fields()
        .into_iter()
        .filter(|field| !data.contains(field))
        .map(str::to_string)
        .collect()
}
