// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 正文规范化模块
//!
//! 将详情页的任意 HTML 子树转换为稳定的纯文本：
//! - 模拟浏览器 `innerText` 的换行与空白折叠规则
//! - 表格按行展平为 `单元格 | 单元格` 的文本块
//! - 统一 NBSP、空白行和连续空行
//!
//! 规范化只读取 DOM，不会修改输入文档，相同输入总是得到相同输出。

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static TABLE_ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hr", "li", "main",
    "nav", "ol", "pre", "section", "tbody", "thead", "tfoot", "tr", "ul", "caption",
];

const PARAGRAPHS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// 规范化文档中第一个匹配 `selector` 的元素
///
/// 没有匹配元素或选择器无效时返回空字符串。
pub fn normalize_content(html: &str, selector: &str) -> String {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Invalid content selector '{}': {:?}", selector, e);
            return String::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(normalize_element)
        .unwrap_or_default()
}

/// 规范化单个元素子树
pub fn normalize_element(element: ElementRef<'_>) -> String {
    let text = inner_text(element).replace('\u{a0}', " ");
    let text = BLANK_LINE.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// 元素的 `innerText` 近似值，去除首尾空白
///
/// 用于列表页的标题、作者、日期等短字段。
pub fn element_text(element: ElementRef<'_>) -> String {
    inner_text(element).replace('\u{a0}', " ").trim().to_string()
}

fn inner_text(element: ElementRef<'_>) -> String {
    let mut builder = TextBuilder::default();
    if element.value().name() == "table" {
        builder.push_block(&flatten_table(element));
    } else {
        builder.walk_children(element);
    }
    builder.out
}

/// 按 `innerText` 规则累积文本
///
/// 块级元素只登记"需要的换行数"，真正写入发生在下一段可见文本之前，
/// 因此首尾和相邻块之间不会产生多余的空行。
#[derive(Default)]
struct TextBuilder {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
}

impl TextBuilder {
    fn walk_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.walk_element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn walk_element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        if SKIPPED.contains(&name) {
            return;
        }

        match name {
            "br" => {
                self.out.push('\n');
                self.pending_space = false;
            }
            "table" => self.push_block(&flatten_table(element)),
            _ if PARAGRAPHS.contains(&name) => {
                self.request_breaks(2);
                self.walk_children(element);
                self.request_breaks(2);
            }
            _ if BLOCKS.contains(&name) => {
                self.request_breaks(1);
                self.walk_children(element);
                self.request_breaks(1);
            }
            _ => self.walk_children(element),
        }
    }

    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            // NBSP is not collapsible
            if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}') {
                if !self.out.is_empty() {
                    self.pending_space = true;
                }
                continue;
            }

            if self.pending_breaks > 0 {
                self.flush_breaks();
            } else if self.pending_space && !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.pending_space = false;
            self.out.push(c);
        }
    }

    fn push_block(&mut self, block: &str) {
        if block.is_empty() {
            return;
        }
        self.request_breaks(1);
        self.flush_breaks();
        self.out.push_str(block);
        self.request_breaks(1);
    }

    fn request_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
        self.pending_space = false;
    }

    fn flush_breaks(&mut self) {
        if !self.out.is_empty() {
            let trailing = self.out.chars().rev().take_while(|c| *c == '\n').count();
            for _ in trailing..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
    }
}

/// 将表格展平为文本块
///
/// 单元格都只有一行时输出 `c1 | c2`；否则按最大行数逐行拼接，
/// 缺失的行以空字符串补齐。没有单元格的行被跳过。
fn flatten_table(table: ElementRef<'_>) -> String {
    let mut lines = Vec::new();

    for row in table.select(&TABLE_ROW) {
        if !belongs_to(row, table) {
            continue;
        }

        let cells: Vec<Vec<String>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .map(cell_lines)
            .collect();
        if cells.is_empty() {
            continue;
        }

        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(0);
        if max_lines <= 1 {
            lines.push(join_line(&cells, 0));
        } else {
            for i in 0..max_lines {
                lines.push(join_line(&cells, i));
            }
        }
    }

    lines.join("\n")
}

fn cell_lines(cell: ElementRef<'_>) -> Vec<String> {
    element_text(cell)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_line(cells: &[Vec<String>], index: usize) -> String {
    cells
        .iter()
        .map(|lines| lines.get(index).map(String::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// 行的最近祖先表格是否为 `table`，嵌套表格的行由内层表格处理
fn belongs_to(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
        .map(|ancestor| ancestor.id() == table.id())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(body: &str) -> String {
        normalize_content(&format!("<html><body><div id=\"c\">{}</div></body></html>", body), "#c")
    }

    #[test]
    fn test_missing_root_yields_empty_string() {
        assert_eq!(normalize_content("<p>hello</p>", ".nothing"), "");
    }

    #[test]
    fn test_invalid_selector_yields_empty_string() {
        assert_eq!(normalize_content("<p>hello</p>", "[[["), "");
    }

    #[test]
    fn test_first_match_in_document_order_is_used() {
        let html = r#"<div class="v">first</div><div class="v">second</div>"#;
        assert_eq!(normalize_content(html, ".v"), "first");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(normalize("  hello \n\t  world  "), "hello world");
    }

    #[test]
    fn test_paragraphs_are_separated_by_blank_line() {
        assert_eq!(normalize("<p>one</p><p>two</p>"), "one\n\ntwo");
        assert_eq!(normalize("<h2>title</h2>body"), "title\n\nbody");
    }

    #[test]
    fn test_blocks_and_breaks_introduce_line_breaks() {
        assert_eq!(normalize("<div>a</div><div>b</div>"), "a\nb");
        assert_eq!(normalize("a<br>b<br/>c"), "a\nb\nc");
        assert_eq!(normalize("<ul><li>x</li><li>y</li></ul>"), "x\ny");
    }

    #[test]
    fn test_hidden_elements_are_skipped() {
        let body = "<script>var x = 1;</script><style>p{}</style>visible<noscript>no</noscript>";
        assert_eq!(normalize(body), "visible");
    }

    #[test]
    fn test_nbsp_becomes_space_and_blank_lines_collapse() {
        assert_eq!(normalize("a&nbsp;b"), "a b");
        assert_eq!(normalize("a<br><br><br><br>b"), "a\n\nb");
        assert_eq!(normalize("a<br>&nbsp;&nbsp;<br>b"), "a\n\nb");
    }

    #[test]
    fn test_single_line_table_cells_join_with_pipes() {
        let body = "<table><tr><td>x</td><td>y</td></tr><tr><td>1</td><td></td></tr></table>";
        assert_eq!(normalize(body), "x | y\n1 |");
    }

    #[test]
    fn test_multi_line_cells_are_zipped_and_padded() {
        let body = "<table>\
            <tr><td>x</td><td>y</td></tr>\
            <tr><td>p<br>q</td><td>r</td></tr>\
            </table><p>after</p>";
        let text = normalize(body);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["x | y", "p | r", "q | ", "", "after"]);
    }

    #[test]
    fn test_rows_without_cells_are_skipped() {
        let body = "<table><tr></tr><tr><th>h1</th><th>h2</th></tr></table>";
        assert_eq!(normalize(body), "h1 | h2");
    }

    #[test]
    fn test_table_is_placed_in_document_flow() {
        let body = "intro<table><tr><td>a</td><td>b</td></tr></table>outro";
        assert_eq!(normalize(body), "intro\na | b\noutro");
    }

    #[test]
    fn test_nested_table_rows_belong_to_inner_table() {
        let body = "<table><tr><td>outer</td><td><table><tr><td>i1</td><td>i2</td></tr></table></td></tr></table>";
        assert_eq!(normalize(body), "outer | i1 | i2");
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let html = "<div id=\"c\"><p>a</p><table><tr><td>1<br>2</td><td>3</td></tr></table></div>";
        assert_eq!(normalize_content(html, "#c"), normalize_content(html, "#c"));
    }

    #[test]
    fn test_element_text_trims() {
        let document = Html::parse_fragment("<span>  공지 \u{a0}</span>");
        let selector = Selector::parse("span").unwrap();
        let span = document.select(&selector).next().unwrap();
        assert_eq!(element_text(span), "공지");
    }
}
