// ==========================================
// 班级排课看板 - 看板状态管理 API
// ==========================================
// 状态: (boxes, schedule, restrictions) + 颜色注册表
// 红线:
// - 前置条件失败 → ApiError + notify，状态不变
// - 冲突放置须经确认（或覆盖策略）才提交；拒绝不是错误
// - 每次提交后持久化完整快照；存储失败只记日志
// - 数量守恒: quantity = 初始 - 放置次数 + 移出次数，且永不为负
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::api::collaborator::UiCollaborator;
use crate::api::error::{ApiError, ApiResult};
use crate::config::OverridePolicy;
use crate::domain::class_box::ClassBox;
use crate::domain::restriction::Restriction;
use crate::domain::schedule::Schedule;
use crate::domain::snapshot::{ExportDocument, ScheduleSnapshot};
use crate::domain::types::{BoxId, RestrictionId, SlotKey};
use crate::engine::color::ColorRegistry;
use crate::engine::conflict::{conflicts_for, find_violations, ConflictReport};
use crate::export;
use crate::i18n::{t, t_with_args};
use crate::repository::SnapshotRepository;

// ==========================================
// 操作结果
// ==========================================

/// 放置结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PlacementOutcome {
    /// 已放置；overridden 非空表示用户临时覆盖了这些冲突
    #[serde(rename_all = "camelCase")]
    Placed { slot: SlotKey, overridden: Vec<BoxId> },
    /// 存在冲突且未获确认，状态未变
    #[serde(rename_all = "camelCase")]
    Declined { slot: SlotKey, conflicts: Vec<BoxId> },
}

/// 导入结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub boxes: usize,
    pub placements: usize,
    pub restrictions: usize,
    pub violations: Vec<ConflictReport>,
}

/// 新ID: 不小于当前毫秒时间戳，且大于所有已有ID；已有ID达到 i64::MAX 时返回 None
fn next_id(existing: impl Iterator<Item = i64>) -> Option<i64> {
    let now = Utc::now().timestamp_millis();
    match existing.max() {
        None => Some(now),
        Some(max) => max.checked_add(1).map(|next| now.max(next)),
    }
}

// ==========================================
// BoardApi - 看板状态管理器
// ==========================================
pub struct BoardApi {
    boxes: Vec<ClassBox>,
    schedule: Schedule,
    restrictions: Vec<Restriction>,
    colors: ColorRegistry,
    repo: Option<Arc<SnapshotRepository>>,
    ui: Arc<dyn UiCollaborator>,
    override_policy: OverridePolicy,
    autosave: bool,
}

impl BoardApi {
    /// 创建空看板（不持久化）
    pub fn new(ui: Arc<dyn UiCollaborator>) -> Self {
        let mut colors = ColorRegistry::new();
        colors.initialize();
        Self {
            boxes: Vec::new(),
            schedule: Schedule::new(),
            restrictions: Vec::new(),
            colors,
            repo: None,
            ui,
            override_policy: OverridePolicy::Ask,
            autosave: true,
        }
    }

    /// 创建带持久化的看板，并加载已保存的快照
    ///
    /// 快照损坏或读取失败时记录错误并从空看板开始
    pub fn with_repository(repo: Arc<SnapshotRepository>, ui: Arc<dyn UiCollaborator>) -> Self {
        let mut api = Self::new(ui);
        match repo.load() {
            Ok(Some(snapshot)) => {
                info!(
                    boxes = snapshot.boxes.len(),
                    placements = snapshot.schedule.len(),
                    "已加载本地快照"
                );
                api.replace_state(snapshot);
            }
            Ok(None) => debug!("无本地快照，使用空看板"),
            Err(e) => error!(error = %e, "本地快照加载失败，使用空看板"),
        }
        api.repo = Some(repo);
        api
    }

    pub fn set_override_policy(&mut self, policy: OverridePolicy) {
        self.override_policy = policy;
    }

    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    // ===== 查询 =====

    pub fn boxes(&self) -> &[ClassBox] {
        &self.boxes
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    pub fn find_box(&self, box_id: BoxId) -> Option<&ClassBox> {
        self.boxes.iter().find(|b| b.id == box_id)
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            boxes: self.boxes.clone(),
            schedule: self.schedule.clone(),
            restrictions: self.restrictions.clone(),
        }
    }

    /// 当前课表中所有违规放置
    pub fn violations(&self) -> Vec<ConflictReport> {
        find_violations(&self.schedule, &self.boxes, &self.restrictions)
    }

    // ===== 盒子 =====

    /// 创建盒子；同一 (班级, 教师) 已存在时累加数量
    #[instrument(skip(self))]
    pub fn create_box(&mut self, class_name: &str, teacher: &str, quantity: i64) -> ApiResult<ClassBox> {
        let quantity = match u32::try_from(quantity) {
            Ok(q) if q > 0 => q,
            _ => {
                return Err(self.reject(
                    ApiError::ValidationError(format!("数量必须为正整数: {}", quantity)),
                    t("validation.invalid_quantity"),
                ))
            }
        };

        let class_name = class_name.trim();
        let teacher = teacher.trim();
        if class_name.is_empty() {
            return Err(self.reject(
                ApiError::ValidationError("班级名不能为空".to_string()),
                t("validation.empty_class_name"),
            ));
        }

        if let Some(idx) = self.boxes.iter().position(|b| b.matches_identity(class_name, teacher)) {
            let updated = match self.boxes[idx].quantity.checked_add(quantity) {
                Some(q) => q,
                None => {
                    return Err(self.reject(
                        ApiError::ValidationError("数量超出上限".to_string()),
                        t("validation.invalid_quantity"),
                    ))
                }
            };
            let b = &mut self.boxes[idx];
            b.quantity = updated;
            b.raise_high_water_mark();
            let result = b.clone();
            info!(box_id = result.id, quantity = result.quantity, "已有盒子数量累加");
            self.persist();
            return Ok(result);
        }

        let id = self.next_box_id()?;
        let color = self.colors.assign_color(class_name, None);
        let new_box = ClassBox::new(id, class_name, teacher, color, quantity);
        info!(box_id = id, color = %new_box.color, "盒子已创建");
        self.boxes.push(new_box.clone());
        self.persist();
        Ok(new_box)
    }

    /// 调整数量（结果下限为 0）
    #[instrument(skip(self))]
    pub fn adjust_quantity(&mut self, box_id: BoxId, delta: i64) -> ApiResult<ClassBox> {
        let idx = self.box_index(box_id)?;
        let b = &mut self.boxes[idx];
        let target = (b.quantity as i64).saturating_add(delta).clamp(0, u32::MAX as i64) as u32;
        if target > b.quantity {
            b.quantity = target;
            b.raise_high_water_mark();
        } else {
            b.quantity = target;
        }
        let result = b.clone();
        debug!(box_id, quantity = result.quantity, "数量已调整");
        self.persist();
        Ok(result)
    }

    /// 修改盒子教师
    #[instrument(skip(self))]
    pub fn edit_teacher(&mut self, box_id: BoxId, teacher: &str) -> ApiResult<ClassBox> {
        let idx = self.box_index(box_id)?;
        let teacher = teacher.trim();
        let class_name = self.boxes[idx].class_name.clone();

        let duplicate = self
            .boxes
            .iter()
            .any(|b| b.id != box_id && b.matches_identity(&class_name, teacher));
        if duplicate {
            return Err(self.reject(
                ApiError::ValidationError(format!("盒子已存在: {} / {}", class_name, teacher)),
                t_with_args(
                    "validation.duplicate_box",
                    &[("class", class_name.as_str()), ("teacher", teacher)],
                ),
            ));
        }

        self.boxes[idx].teacher = teacher.to_string();
        let result = self.boxes[idx].clone();
        self.persist();
        Ok(result)
    }

    /// 删除盒子；已有放置保留为悬空引用
    ///
    /// 没有其他盒子使用该班级名时释放其颜色
    #[instrument(skip(self))]
    pub fn delete_box(&mut self, box_id: BoxId) -> ApiResult<ClassBox> {
        let idx = self.box_index(box_id)?;
        let removed = self.boxes.remove(idx);

        if !self.boxes.iter().any(|b| b.class_name == removed.class_name) {
            self.colors.release(&removed.class_name);
        }

        let dangling = self.schedule.placements_of(box_id).len();
        info!(box_id, dangling, "盒子已删除");
        self.persist();
        Ok(removed)
    }

    // ===== 放置 =====

    /// 将盒子放入槽位
    ///
    /// 前置条件: 槽位空闲、盒子存在且 quantity > 0
    /// 有冲突时按覆盖策略处理（ASK 询问用户）
    #[instrument(skip(self), fields(slot = %key))]
    pub fn place_box(&mut self, box_id: BoxId, key: SlotKey) -> ApiResult<PlacementOutcome> {
        let idx = self.box_index(box_id)?;

        if let Some(occupant) = self.schedule.get(&key) {
            let slot = key.to_string();
            return Err(self.reject(
                ApiError::SlotOccupied { slot: key, occupant },
                t_with_args("board.slot_occupied", &[("slot", slot.as_str())]),
            ));
        }

        if !self.boxes[idx].is_available() {
            let class_name = self.boxes[idx].class_name.clone();
            return Err(self.reject(
                ApiError::QuantityExhausted(box_id),
                t_with_args("board.no_units_left", &[("class", class_name.as_str())]),
            ));
        }

        let conflicts = conflicts_for(
            box_id,
            key.day,
            key.period,
            &self.schedule,
            &self.boxes,
            &self.restrictions,
        );

        if !conflicts.is_empty() {
            let accepted = match self.override_policy {
                OverridePolicy::Ask => self.ui.confirm(&t("board.conflict_confirm")),
                OverridePolicy::Always => true,
                OverridePolicy::Never => {
                    self.ui.notify(&t("board.conflict_refused"));
                    false
                }
            };
            if !accepted {
                info!(box_id, ?conflicts, "冲突放置未获确认");
                return Ok(PlacementOutcome::Declined { slot: key, conflicts });
            }
            warn!(box_id, ?conflicts, "冲突放置已临时覆盖");
        }

        if let Err(occupant) = self.schedule.assign(key, box_id) {
            return Err(ApiError::InternalError(format!(
                "槽位 {} 意外被占用: {}",
                key, occupant
            )));
        }
        self.boxes[idx].quantity -= 1;
        info!(box_id, remaining = self.boxes[idx].quantity, "盒子已放置");
        self.persist();

        Ok(PlacementOutcome::Placed {
            slot: key,
            overridden: conflicts,
        })
    }

    /// 从槽位移出盒子；空槽位为无操作
    ///
    /// 返回被移出的盒子ID（悬空引用同样移出，但不回补数量）
    #[instrument(skip(self), fields(slot = %key))]
    pub fn remove_from_slot(&mut self, key: &SlotKey) -> Option<BoxId> {
        let box_id = self.schedule.release(key)?;
        match self.boxes.iter_mut().find(|b| b.id == box_id) {
            Some(b) => {
                b.quantity = b.quantity.saturating_add(1);
                info!(box_id, remaining = b.quantity, "盒子已移出");
            }
            None => debug!(box_id, "移出悬空引用"),
        }
        self.persist();
        Some(box_id)
    }

    /// 清空课表（需确认），所有放置回补到各自盒子
    ///
    /// 返回 None 表示用户取消，否则为移出的放置数
    #[instrument(skip(self))]
    pub fn clear_schedule(&mut self) -> Option<usize> {
        if !self.ui.confirm(&t("board.clear_confirm")) {
            return None;
        }
        let keys: Vec<SlotKey> = self.schedule.iter().map(|(k, _)| *k).collect();
        for key in &keys {
            if let Some(box_id) = self.schedule.release(key) {
                if let Some(b) = self.boxes.iter_mut().find(|b| b.id == box_id) {
                    b.quantity = b.quantity.saturating_add(1);
                }
            }
        }
        info!(placements = keys.len(), "课表已清空");
        self.persist();
        Some(keys.len())
    }

    /// 重置看板（需确认）: 清空盒子、课表、限制规则与颜色
    #[instrument(skip(self))]
    pub fn reset_board(&mut self) -> bool {
        if !self.ui.confirm(&t("board.reset_confirm")) {
            return false;
        }
        self.boxes.clear();
        self.schedule.clear();
        self.restrictions.clear();
        self.colors.initialize();

        if let Some(repo) = &self.repo {
            if let Err(e) = repo.clear() {
                error!(error = %e, "本地快照删除失败");
            }
        }
        info!("看板已重置");
        true
    }

    // ===== 限制规则 =====

    /// 添加限制规则（两端模式去除首尾空白后保存）
    #[instrument(skip(self))]
    pub fn add_restriction(&mut self, pattern1: &str, pattern2: &str) -> ApiResult<Restriction> {
        let (p1, p2) = (pattern1.trim(), pattern2.trim());

        if p1.is_empty() || p2.is_empty() {
            return Err(self.reject(
                ApiError::ValidationError("限制规则两端模式均不能为空".to_string()),
                t("validation.empty_pattern"),
            ));
        }
        if p1 == p2 {
            return Err(self.reject(
                ApiError::ValidationError(format!("限制规则两端模式相同: {}", p1)),
                t("validation.identical_patterns"),
            ));
        }

        if self.restrictions.iter().any(|r| r.is_equivalent(p1, p2)) {
            return Err(self.reject(
                ApiError::DuplicateRestriction {
                    pattern1: p1.to_string(),
                    pattern2: p2.to_string(),
                },
                t("validation.duplicate_restriction"),
            ));
        }

        let id = self.next_restriction_id()?;
        let candidate = Restriction::new(id, p1, p2);

        info!(restriction_id = candidate.id, "限制规则已添加");
        self.restrictions.push(candidate.clone());
        self.persist();
        Ok(candidate)
    }

    /// 删除限制规则（不回溯校验已有放置）
    #[instrument(skip(self))]
    pub fn delete_restriction(&mut self, restriction_id: RestrictionId) -> ApiResult<Restriction> {
        let idx = match self.restrictions.iter().position(|r| r.id == restriction_id) {
            Some(idx) => idx,
            None => {
                let id = restriction_id.to_string();
                return Err(self.reject(
                    ApiError::NotFound(format!("限制规则(id={})不存在", restriction_id)),
                    t_with_args("board.restriction_not_found", &[("id", id.as_str())]),
                ));
            }
        };
        let removed = self.restrictions.remove(idx);
        info!(restriction_id, "限制规则已删除");
        self.persist();
        Ok(removed)
    }

    // ===== 导入/导出 =====

    /// 导入 JSON 文档（原子替换）
    ///
    /// 文档校验失败时状态不变；导入后的冲突只报告，不拒绝
    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub fn import_json(&mut self, raw: &str) -> ApiResult<ImportSummary> {
        let snapshot = match ScheduleSnapshot::from_json_document(raw) {
            Ok(s) => s,
            Err(e) => {
                let reason = e.to_string();
                return Err(self.reject(
                    e.into(),
                    t_with_args("import.invalid_document", &[("reason", reason.as_str())]),
                ));
            }
        };

        let irregular = snapshot.irregular_restrictions();
        if !irregular.is_empty() {
            warn!(?irregular, "导入的限制规则存在空模式、相同模式或重复规则");
        }

        self.replace_state(snapshot);

        let violations = self.violations();
        if !violations.is_empty() {
            let count = violations.len().to_string();
            warn!(count = violations.len(), "导入的课表存在冲突");
            self.ui
                .notify(&t_with_args("import.conflicts_found", &[("count", count.as_str())]));
        }

        info!(
            boxes = self.boxes.len(),
            placements = self.schedule.len(),
            restrictions = self.restrictions.len(),
            "导入完成"
        );
        self.persist();

        Ok(ImportSummary {
            boxes: self.boxes.len(),
            placements: self.schedule.len(),
            restrictions: self.restrictions.len(),
            violations,
        })
    }

    /// 从文件导入
    pub async fn import_file(&mut self, path: &Path) -> ApiResult<ImportSummary> {
        let raw = match export::read_import_file(path).await {
            Ok(raw) => raw,
            Err(e) => {
                let reason = e.to_string();
                return Err(self.reject(
                    ApiError::ImportError(reason.clone()),
                    t_with_args("import.read_failed", &[("reason", reason.as_str())]),
                ));
            }
        };
        self.import_json(&raw)
    }

    /// 构造导出文档
    pub fn export_json(&self, now: DateTime<Utc>) -> ExportDocument {
        export::export_document(&self.snapshot(), now)
    }

    /// 导出 JSON 文件
    pub async fn export_json_file(&self, path: &Path) -> ApiResult<ExportDocument> {
        let document = self.export_json(Utc::now());
        if let Err(e) = export::write_json_export(path, &document).await {
            let reason = e.to_string();
            return Err(self.reject(
                e.into(),
                t_with_args("export.failed", &[("reason", reason.as_str())]),
            ));
        }
        Ok(document)
    }

    /// 导出 PDF（光栅化与写出由协作方完成，失败不影响看板状态）
    pub async fn export_pdf(
        &self,
        rasterizer: &dyn export::GridRasterizer,
        sink: &dyn export::PdfSink,
        path: &Path,
    ) -> ApiResult<export::PdfPageLayout> {
        match export::export_pdf(rasterizer, sink, path).await {
            Ok(layout) => Ok(layout),
            Err(e) => {
                let reason = e.to_string();
                Err(self.reject(
                    e.into(),
                    t_with_args("export.failed", &[("reason", reason.as_str())]),
                ))
            }
        }
    }

    // ===== 内部 =====

    fn next_box_id(&self) -> ApiResult<BoxId> {
        next_id(self.boxes.iter().map(|b| b.id)).ok_or_else(|| {
            self.reject(
                ApiError::ValidationError("盒子ID已达上限".to_string()),
                t("board.id_exhausted"),
            )
        })
    }

    fn next_restriction_id(&self) -> ApiResult<RestrictionId> {
        next_id(self.restrictions.iter().map(|r| r.id)).ok_or_else(|| {
            self.reject(
                ApiError::ValidationError("限制规则ID已达上限".to_string()),
                t("board.id_exhausted"),
            )
        })
    }

    fn box_index(&self, box_id: BoxId) -> ApiResult<usize> {
        match self.boxes.iter().position(|b| b.id == box_id) {
            Some(idx) => Ok(idx),
            None => {
                let id = box_id.to_string();
                Err(self.reject(
                    ApiError::NotFound(format!("盒子(id={})不存在", box_id)),
                    t_with_args("board.box_not_found", &[("id", id.as_str())]),
                ))
            }
        }
    }

    /// 整体替换状态，并按盒子的 (班级, 颜色) 重建颜色注册表
    fn replace_state(&mut self, snapshot: ScheduleSnapshot) {
        let ScheduleSnapshot {
            boxes,
            schedule,
            restrictions,
        } = snapshot;
        self.boxes = boxes;
        self.schedule = schedule;
        self.restrictions = restrictions;
        self.colors.import_assignments(
            self.boxes
                .iter()
                .map(|b| (b.class_name.as_str(), b.color.as_str())),
        );
    }

    fn reject(&self, err: ApiError, message: String) -> ApiError {
        warn!(code = err.code(), error = %err, "操作被拒绝");
        self.ui.notify(&message);
        err
    }

    fn persist(&self) {
        if !self.autosave {
            return;
        }
        if let Some(repo) = &self.repo {
            if let Err(e) = repo.save(&self.snapshot()) {
                error!(error = %e, "看板快照保存失败");
                self.ui.notify(&t("board.storage_failed"));
            }
        }
    }

    /// 手动保存（autosave 关闭时使用）
    pub fn save_now(&self) -> ApiResult<()> {
        match &self.repo {
            Some(repo) => Ok(repo.save(&self.snapshot())?),
            None => Ok(()),
        }
    }
}
