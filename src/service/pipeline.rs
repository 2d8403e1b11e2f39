use crate::config::AppConfig;
use crate::error::ReconError;
use crate::models::{
    CanonicalKey, ColumnMapping, MappingResult, RawDataset, ReconcileReport, Warnings,
};
use crate::service::field_mapper::FieldMapper;
use crate::service::reconciler::reconcile;
use crate::service::standardizer::RecordStandardizer;
use serde::Serialize;
use std::collections::HashMap;

/// 映射检查结果 (上传后返回给调用方确认)
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport {
    pub columns: Vec<String>,
    pub auto_mapping: ColumnMapping,
    pub missing: Vec<CanonicalKey>,
    pub required_keys: Vec<CanonicalKey>,
}

/// 对账服务: 映射 -> 两侧清洗 -> 对账 -> 汇总
pub struct ReconcileService {
    mapper: FieldMapper,
    standardizer: RecordStandardizer,
    official_label: String,
    service_label: String,
}

impl ReconcileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            mapper: FieldMapper::new(config.mapping.aliases.clone()),
            standardizer: RecordStandardizer::new(config.cleaning.valid_statuses.clone()),
            official_label: config.labels.official.clone(),
            service_label: config.labels.service.clone(),
        }
    }

    /// 推断映射, 供调用方确认或修改
    pub fn inspect(&self, dataset: &RawDataset) -> MappingReport {
        let result = self.mapper.infer_mapping(&dataset.headers);
        MappingReport {
            columns: dataset.headers.clone(),
            auto_mapping: result.mapping,
            missing: result.missing_keys,
            required_keys: CanonicalKey::ALL.to_vec(),
        }
    }

    /// 有手工映射时校验手工映射, 否则自动推断
    fn resolve_mapping(
        &self,
        dataset: &RawDataset,
        proposed: Option<&HashMap<CanonicalKey, String>>,
    ) -> MappingResult {
        match proposed {
            Some(p) => self.mapper.validate_mapping(p, &dataset.headers),
            None => self.mapper.infer_mapping(&dataset.headers),
        }
    }

    /// 执行比对
    ///
    /// 任一侧映射不完整时直接失败; 告警按 官方 -> 客服 -> 对账 顺序原样返回。
    pub fn compare(
        &self,
        official: &RawDataset,
        service: &RawDataset,
        official_mapping: Option<&HashMap<CanonicalKey, String>>,
        service_mapping: Option<&HashMap<CanonicalKey, String>>,
    ) -> Result<ReconcileReport, ReconError> {
        let official_map = self.resolve_mapping(official, official_mapping);
        let service_map = self.resolve_mapping(service, service_mapping);

        if !official_map.is_complete() || !service_map.is_complete() {
            return Err(ReconError::IncompleteMappings {
                official: official_map.missing_keys,
                service: service_map.missing_keys,
            });
        }

        let official_resolved = official_map.mapping.resolve(&self.official_label)?;
        let service_resolved = service_map.mapping.resolve(&self.service_label)?;

        tracing::info!(
            "开始比对: 官方 {} 行, 客服 {} 行",
            official.rows.len(),
            service.rows.len()
        );

        let (official_out, service_out) = rayon::join(
            || {
                self.standardizer
                    .standardize(official, &official_resolved, &self.official_label)
            },
            || {
                self.standardizer
                    .standardize(service, &service_resolved, &self.service_label)
            },
        );

        let reconciled = reconcile(&official_out.records, &service_out.records);
        let summary = reconciled.summary;

        let mut warnings = Warnings::new();
        warnings.extend(official_out.warnings);
        warnings.extend(service_out.warnings);
        warnings.extend(reconciled.warnings);

        tracing::info!(
            "比对完成: 匹配 {}, 客服漏记 {}, 客服多记 {}, 亏损 {}",
            summary.matched_count,
            summary.missing_count,
            summary.extra_count,
            summary.loss_count
        );

        Ok(ReconcileReport {
            warnings: warnings.into_vec(),
            summary,
            rows: reconciled.records,
        })
    }
}
