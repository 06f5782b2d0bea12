//! # MemorySink
//!
//! 把所有输出记录在内存中的 [`TextSink`] 实现。
//!
//! 用于无显示设备的宿主（预览、测试）。除了当前状态，
//! 还按顺序记录每一次调用，方便断言帧序列。

use std::collections::BTreeMap;

use crate::error::SinkError;
use crate::sink::{Color, FilterHandle, FilterKind, Position, SurfaceKind, TextSink};

/// sink 收到的一次调用
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// 写入文字
    Text { text: String, color: Option<Color> },
    /// 移动位置
    Moved(Position),
    /// 新建滤镜
    FilterAdded(FilterKind),
    /// 更新滤镜参数
    FilterUpdated {
        kind: FilterKind,
        key: String,
        value: i64,
    },
    /// 移除滤镜
    FilterRemoved(FilterKind),
    /// 播放声音
    SoundStarted(String),
    /// 停止声音
    SoundStopped(String),
    /// 图层可见性变化
    LayerVisible { layer: String, visible: bool },
}

/// 已挂载的滤镜
#[derive(Debug, Clone, PartialEq)]
pub struct MountedFilter {
    pub kind: FilterKind,
    pub params: BTreeMap<String, i64>,
}

/// 内存输出端
#[derive(Debug, Clone)]
pub struct MemorySink {
    kind: SurfaceKind,
    text: String,
    color: Option<Color>,
    /// `None` 表示显示对象不在当前场景
    position: Option<Position>,
    filters: BTreeMap<FilterHandle, MountedFilter>,
    next_handle: u64,
    playing: Vec<String>,
    visible_layers: Vec<String>,
    events: Vec<SinkEvent>,
}

impl MemorySink {
    /// 创建位于原点的输出端
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            text: String::new(),
            color: None,
            position: Some(Position::default()),
            filters: BTreeMap::new(),
            next_handle: 1,
            playing: Vec::new(),
            visible_layers: Vec::new(),
            events: Vec::new(),
        }
    }

    /// 创建不在当前场景中的输出端（读不到位置）
    pub fn detached(kind: SurfaceKind) -> Self {
        Self {
            position: None,
            ..Self::new(kind)
        }
    }

    /// 设置初始位置
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// 模拟外部（用户拖动）修改位置，不记录事件
    pub fn move_externally(&mut self, position: Position) {
        self.position = Some(position);
    }

    /// 当前文字
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 当前颜色
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// 当前位置
    pub fn current_position(&self) -> Option<Position> {
        self.position
    }

    /// 当前挂载的滤镜
    pub fn filter(&self, kind: FilterKind) -> Option<&MountedFilter> {
        self.filters.values().find(|f| f.kind == kind)
    }

    /// 挂载的滤镜数量
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// 声音是否在播放
    pub fn is_playing(&self, source: &str) -> bool {
        self.playing.iter().any(|s| s == source)
    }

    /// 图层是否可见
    pub fn is_layer_visible(&self, layer: &str) -> bool {
        self.visible_layers.iter().any(|l| l == layer)
    }

    /// 全部调用记录
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// 按顺序写入过的文字
    pub fn frames(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 按顺序写入过的颜色（只统计带颜色的帧）
    pub fn colors(&self) -> Vec<Color> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Text { color, .. } => *color,
                _ => None,
            })
            .collect()
    }

    /// 清空调用记录，保留当前状态
    pub fn take_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.events)
    }

    fn mounted_mut(&mut self, handle: FilterHandle) -> Result<&mut MountedFilter, SinkError> {
        self.filters
            .get_mut(&handle)
            .ok_or(SinkError::StaleFilter { handle: handle.0 })
    }
}

impl TextSink for MemorySink {
    fn surface_kind(&self) -> SurfaceKind {
        self.kind
    }

    fn set_text(&mut self, text: &str, color: Option<Color>) -> Result<(), SinkError> {
        self.text = text.to_string();
        if color.is_some() {
            self.color = color;
        }
        self.events.push(SinkEvent::Text {
            text: text.to_string(),
            color,
        });
        Ok(())
    }

    fn position(&self) -> Result<Option<Position>, SinkError> {
        Ok(self.position)
    }

    fn set_position(&mut self, position: Position) -> Result<(), SinkError> {
        if self.position.is_some() {
            self.position = Some(position);
            self.events.push(SinkEvent::Moved(position));
        }
        Ok(())
    }

    fn ensure_filter(&mut self, kind: FilterKind) -> Result<Option<FilterHandle>, SinkError> {
        if let Some((handle, _)) = self.filters.iter().find(|(_, f)| f.kind == kind) {
            return Ok(Some(*handle));
        }

        let handle = FilterHandle(self.next_handle);
        self.next_handle += 1;

        let mut params = BTreeMap::new();
        if let Some(value) = kind.initial_value() {
            params.insert(kind.param_key().to_string(), value);
        }
        self.filters.insert(handle, MountedFilter { kind, params });
        self.events.push(SinkEvent::FilterAdded(kind));
        Ok(Some(handle))
    }

    fn update_filter(
        &mut self,
        handle: FilterHandle,
        key: &str,
        value: i64,
    ) -> Result<(), SinkError> {
        let filter = self.mounted_mut(handle)?;
        filter.params.insert(key.to_string(), value);
        let kind = filter.kind;
        self.events.push(SinkEvent::FilterUpdated {
            kind,
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn remove_filter(&mut self, handle: FilterHandle) -> Result<(), SinkError> {
        let filter = self
            .filters
            .remove(&handle)
            .ok_or(SinkError::StaleFilter { handle: handle.0 })?;
        self.events.push(SinkEvent::FilterRemoved(filter.kind));
        Ok(())
    }

    fn play_sound(&mut self, source: &str) -> Result<(), SinkError> {
        if !self.is_playing(source) {
            self.playing.push(source.to_string());
        }
        self.events.push(SinkEvent::SoundStarted(source.to_string()));
        Ok(())
    }

    fn stop_sound(&mut self, source: &str) -> Result<(), SinkError> {
        self.playing.retain(|s| s != source);
        self.events.push(SinkEvent::SoundStopped(source.to_string()));
        Ok(())
    }

    fn set_layer_visible(&mut self, layer: &str, visible: bool) -> Result<(), SinkError> {
        self.visible_layers.retain(|l| l != layer);
        if visible {
            self.visible_layers.push(layer.to_string());
        }
        self.events.push(SinkEvent::LayerVisible {
            layer: layer.to_string(),
            visible,
        });
        Ok(())
    }
}
