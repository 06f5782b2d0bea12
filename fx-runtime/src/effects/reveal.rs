//! # 揭示效果
//!
//! typewriter / scramble / fastread / erase。
//!
//! 所有长度都按字符（Unicode 标量值）计算，而不是字节。

use rand::Rng;

use crate::effects::{EffectContext, pad_right};
use crate::error::SinkError;

/// scramble 每个字符的随机帧数
pub const SCRAMBLE_ITERATIONS: usize = 3;

/// scramble 的随机字符集：数字、字母、ASCII 标点
pub const SCRAMBLE_ALPHABET: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

/// 逐字打出
///
/// 第 k 个 tick 显示前 k 个字符，右侧补空格到原长度。
pub fn typewriter(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let chars: Vec<char> = ctx.text.chars().collect();
    ctx.cursor.typewriter_index += 1;

    let shown = ctx.cursor.typewriter_index.min(chars.len());
    let frame = pad_right(&chars[..shown], chars.len());
    ctx.show(&frame)
}

/// 随机字符逐个揭示
///
/// 首个 tick 生成整段帧序列；序列用完后一直显示原文。
pub fn scramble(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    if ctx.cursor.scramble_frames.is_none() {
        let frames = scramble_frames(ctx.text, &mut *ctx.rng);
        ctx.cursor.scramble_frames = Some(frames);
    }

    let frame = ctx
        .cursor
        .scramble_frames
        .as_ref()
        .and_then(|frames| frames.get(ctx.cursor.scramble_index))
        .cloned();

    match frame {
        Some(frame) => {
            ctx.cursor.scramble_index += 1;
            ctx.show(&frame)
        }
        None => {
            let text = ctx.text;
            ctx.show(text)
        }
    }
}

/// 生成 scramble 帧序列
///
/// 每个非空格字符先出现 [`SCRAMBLE_ITERATIONS`] 帧随机字符，空格保持空白；
/// 最后一帧为完整原文。所有帧宽度与原文相同。
/// 空文字返回空序列。
pub fn scramble_frames<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let alphabet: Vec<char> = SCRAMBLE_ALPHABET.chars().collect();
    let width = chars.len();

    let mut frames = Vec::with_capacity(width * SCRAMBLE_ITERATIONS + 1);
    for (i, &ch) in chars.iter().enumerate() {
        for _ in 0..SCRAMBLE_ITERATIONS {
            let mut frame: String = chars[..i].iter().collect();
            if ch == ' ' {
                frame.extend(std::iter::repeat_n(' ', width - i));
            } else {
                frame.push(alphabet[rng.gen_range(0..alphabet.len())]);
                frame.extend(std::iter::repeat_n(' ', width - i - 1));
            }
            frames.push(frame);
        }
    }
    if width > 0 {
        frames.push(text.to_string());
    }
    frames
}

/// 每次显示一个单词
///
/// 含 `;` 时按 `;` 分隔，否则按空白分隔；单词居中补齐到最长单词的宽度。
/// 单词用完后清空。
pub fn fastread(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    if ctx.cursor.words.is_none() {
        ctx.cursor.words = Some(split_words(ctx.text));
    }

    let word = ctx
        .cursor
        .words
        .as_ref()
        .and_then(|words| words.get(ctx.cursor.word_index))
        .cloned();

    match word {
        Some(word) => {
            ctx.cursor.word_index += 1;
            ctx.show(&word)
        }
        None => ctx.clear(),
    }
}

/// 拆分并居中补齐单词
pub fn split_words(text: &str) -> Vec<String> {
    let words: Vec<&str> = if text.contains(';') {
        text.split(';').collect()
    } else {
        text.split_whitespace().collect()
    };
    let width = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
    words.iter().map(|w| center(w, width)).collect()
}

/// 居中补齐；奇数空白时多出的空格放在哪一侧取决于总宽度的奇偶
fn center(word: &str, width: usize) -> String {
    let len = word.chars().count();
    if len >= width {
        return word.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;

    let mut out = String::with_capacity(word.len() + margin);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(word);
    out.extend(std::iter::repeat_n(' ', right));
    out
}

/// 逐字打出再逐字删除，循环 `;` 分隔的短语
///
/// ```text
/// "ab": "  " -> "a " -> "ab" -> "a" -> "" -> 下一个短语
/// ```
///
/// 删除阶段的第一帧仍是完整短语，最后一个字符不会一打出就消失。
pub fn erase(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    if ctx.take_first_tick() || ctx.cursor.phrases.is_empty() {
        ctx.cursor.phrases = ctx.text.split(';').map(str::to_string).collect();
        ctx.cursor.phrase_index = 0;
    }

    let cursor = &mut *ctx.cursor;
    let phrase: Vec<char> = cursor.phrases[cursor.phrase_index % cursor.phrases.len()]
        .chars()
        .collect();
    let len = phrase.len();

    let typed = pad_right(&phrase[..cursor.erase_index.min(len)], len);
    cursor.erase_index += 1;

    let frame = if cursor.erase_index > len {
        let kept = len.saturating_sub(cursor.erase_reversal);
        let frame: String = phrase[..kept].iter().collect();
        cursor.erase_reversal += 1;
        if cursor.erase_reversal > len {
            cursor.erase_index = 0;
            cursor.phrase_index = (cursor.phrase_index + 1) % cursor.phrases.len();
        }
        frame
    } else {
        cursor.erase_reversal = 0;
        typed
    };
    ctx.show(&frame)
}
