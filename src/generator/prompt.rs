use crate::generator::catalog::SectionSpec;
use crate::types::ProjectData;

/// 章节 prompt 组装器
///
/// 项目数据只序列化一次，同一次运行内所有章节共享同一份快照。
pub struct PromptComposer {
    context: String,
}

impl PromptComposer {
    pub fn new(data: &ProjectData) -> Self {
        Self {
            context: data.to_pretty_json(),
        }
    }

    /// `Project data: <JSON>` + 空行 + 章节指令
    pub fn compose(&self, section: &SectionSpec) -> String {
        format!("Project data: {}\n\n{}", self.context, section.instruction)
    }
}
