use crate::config::{Config, LLMProvider};
use crate::error::{AoaError, Result};
use clap::Parser;
use std::path::PathBuf;

/// aoa-gen - 基于LLM的备选方案分析（AoA）报告生成器
#[derive(Parser, Debug)]
#[command(name = "aoa-gen")]
#[command(
    about = "Fills an Analysis of Alternatives markdown template with LLM-generated sections, one request per catalog section."
)]
#[command(version)]
pub struct Args {
    /// 项目根目录，默认为当前工作目录
    #[arg(short, long)]
    pub project_root: Option<PathBuf>,

    /// 报告模板路径（相对于项目根目录）
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// 项目描述输入文档路径（相对于项目根目录）
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 报告输出路径（相对于项目根目录）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 配置文件路径，未指定时尝试项目根目录下的 aoa.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 外部章节目录（TOML）
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// LLM Provider (openai, azure)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 模型名称；Azure 下同时作为缺省的部署名称
    #[arg(long)]
    pub model: Option<String>,

    /// 单个章节的最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 章节引用的输入字段缺失时报错
    #[arg(long)]
    pub strict_fields: bool,

    /// 只生成模板中存在占位符的章节
    #[arg(long)]
    pub skip_unused_sections: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置，CLI参数优先于配置文件
    pub fn into_config(self) -> Result<Config> {
        let project_root = match self.project_root {
            Some(root) => root,
            None => std::env::current_dir().map_err(|e| {
                AoaError::config(format!("failed to determine working directory: {}", e))
            })?,
        };

        let mut config = Config::load(&project_root, self.config.as_deref())?;

        if let Some(template) = self.template {
            config.template_path = template;
        }
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(catalog) = self.catalog {
            config.catalog_path = Some(catalog);
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            let provider = provider_str
                .parse::<LLMProvider>()
                .map_err(AoaError::config)?;
            config.llm.provider = Some(provider);
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        // 开关只能打开，不会关闭配置文件中已启用的选项
        config.strict_fields |= self.strict_fields;
        config.skip_unused_sections |= self.skip_unused_sections;
        config.verbose |= self.verbose;

        Ok(config)
    }
}
