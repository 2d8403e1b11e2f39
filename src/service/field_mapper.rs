use crate::config::FieldAliases;
use crate::models::{CanonicalKey, ColumnMapping, MappingResult};
use std::collections::{HashMap, HashSet};

/// 表头归一化: 去首尾空白, 转小写, 去掉所有内部空白
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// 字段映射器: 原始表头 -> 5个标准字段
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    aliases: FieldAliases,
}

impl FieldMapper {
    pub fn new(aliases: FieldAliases) -> Self {
        Self { aliases }
    }

    /// 自动推断映射
    ///
    /// 每个字段先按别名顺序做精确匹配(忽略大小写和空白), 都不命中时
    /// 再按表头顺序做包含匹配, 取第一个包含任一别名的表头。
    pub fn infer_mapping(&self, headers: &[String]) -> MappingResult {
        // 归一化表头 -> 原始表头; 归一化后重名时保留后出现的
        let normalized: HashMap<String, &String> =
            headers.iter().map(|h| (normalize_header(h), h)).collect();

        let mut mapping = ColumnMapping::new();
        for key in CanonicalKey::ALL {
            let aliases: Vec<String> = self
                .aliases
                .for_key(key)
                .iter()
                .map(|a| normalize_header(a))
                .collect();

            let exact = aliases
                .iter()
                .find_map(|a| normalized.get(a).map(|h| (*h).clone()));

            let found = exact.or_else(|| {
                headers
                    .iter()
                    .find(|h| {
                        let nh = normalize_header(h);
                        aliases.iter().any(|a| nh.contains(a.as_str()))
                    })
                    .cloned()
            });

            tracing::debug!("字段映射 {} -> {:?}", key, found);
            mapping.set(key, found);
        }

        let result = MappingResult::from_mapping(mapping);
        if !result.is_complete() {
            tracing::info!("自动映射未解析字段: {:?}", result.missing_keys);
        }
        result
    }

    /// 校验手工映射: 只接受确实存在于表头列表中的表头
    pub fn validate_mapping(
        &self,
        proposed: &HashMap<CanonicalKey, String>,
        headers: &[String],
    ) -> MappingResult {
        let available: HashSet<&str> = headers.iter().map(String::as_str).collect();

        let mut mapping = ColumnMapping::new();
        for key in CanonicalKey::ALL {
            let selected = proposed
                .get(&key)
                .filter(|h| available.contains(h.as_str()))
                .cloned();
            mapping.set(key, selected);
        }

        MappingResult::from_mapping(mapping)
    }
}
