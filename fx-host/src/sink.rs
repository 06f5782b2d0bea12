//! # TerminalSink
//!
//! 把帧输出到终端的 [`TextSink`]。
//!
//! 每次写入文字输出一行；声音、图层和滤镜只记录日志。
//! 显示对象的状态（位置、滤镜参数）交给内部的 [`MemorySink`] 维护。

use std::io::{self, Write};

use tracing::{debug, info};

use fx_runtime::{
    Color, FilterHandle, FilterKind, MemorySink, Position, SinkError, SurfaceKind, TextSink,
};

/// 终端输出端
pub struct TerminalSink<W: Write> {
    /// 显示对象名称
    name: String,
    /// 显示对象状态
    state: MemorySink,
    /// 帧输出
    out: W,
    /// 是否附带颜色列
    show_colors: bool,
    /// 已输出的帧数
    frames: usize,
}

impl TerminalSink<io::Stdout> {
    /// 输出到标准输出
    pub fn stdout(name: impl Into<String>, kind: SurfaceKind) -> Self {
        Self::new(name, kind, io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(name: impl Into<String>, kind: SurfaceKind, out: W) -> Self {
        Self {
            name: name.into(),
            state: MemorySink::new(kind),
            out,
            show_colors: false,
            frames: 0,
        }
    }

    /// 在每帧后附带该显示对象类型下的颜色值
    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    /// 显示对象状态
    pub fn state(&self) -> &MemorySink {
        &self.state
    }

    /// 已输出的帧数
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn write_frame(&mut self, text: &str, color: Option<Color>) -> Result<(), SinkError> {
        let kind = self.state.surface_kind();
        let result = match color {
            Some(color) if self.show_colors => {
                writeln!(self.out, "{text}\t{:#010x}", color.surface_value(kind))
            }
            _ => writeln!(self.out, "{text}"),
        };
        result
            .and_then(|()| self.out.flush())
            .map_err(|e| SinkError::Backend {
                message: e.to_string(),
            })?;
        self.frames += 1;
        Ok(())
    }
}

impl<W: Write> TextSink for TerminalSink<W> {
    fn surface_kind(&self) -> SurfaceKind {
        self.state.surface_kind()
    }

    fn set_text(&mut self, text: &str, color: Option<Color>) -> Result<(), SinkError> {
        self.state.set_text(text, color)?;
        self.write_frame(text, color)
    }

    fn position(&self) -> Result<Option<Position>, SinkError> {
        self.state.position()
    }

    fn set_position(&mut self, position: Position) -> Result<(), SinkError> {
        debug!(surface = %self.name, x = position.x, y = position.y, "移动");
        self.state.set_position(position)
    }

    fn ensure_filter(&mut self, kind: FilterKind) -> Result<Option<FilterHandle>, SinkError> {
        let existed = self.state.filter(kind).is_some();
        let handle = self.state.ensure_filter(kind)?;
        if !existed {
            info!(surface = %self.name, filter = kind.filter_name(), "添加滤镜");
        }
        Ok(handle)
    }

    fn update_filter(
        &mut self,
        handle: FilterHandle,
        key: &str,
        value: i64,
    ) -> Result<(), SinkError> {
        debug!(surface = %self.name, key, value, "更新滤镜参数");
        self.state.update_filter(handle, key, value)
    }

    fn remove_filter(&mut self, handle: FilterHandle) -> Result<(), SinkError> {
        info!(surface = %self.name, handle = handle.0, "移除滤镜");
        self.state.remove_filter(handle)
    }

    fn play_sound(&mut self, source: &str) -> Result<(), SinkError> {
        info!(source, "播放声音");
        self.state.play_sound(source)
    }

    fn stop_sound(&mut self, source: &str) -> Result<(), SinkError> {
        info!(source, "停止声音");
        self.state.stop_sound(source)
    }

    fn set_layer_visible(&mut self, layer: &str, visible: bool) -> Result<(), SinkError> {
        info!(layer, visible, "图层可见性");
        self.state.set_layer_visible(layer, visible)
    }
}
