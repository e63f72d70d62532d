//! # 태그 입력 위젯
//!
//! 확정된 태그(칩) 목록과 입력 중인 초안, 자동완성 후보를 관리합니다.
//!
//! ## 키 동작
//! | 키 | 동작 |
//! |----|------|
//! | Enter / Tab / `,` | 강조된 후보 또는 초안을 태그로 확정 |
//! | ArrowDown / ArrowUp | 후보 강조 이동 (끝에서 멈춤) |
//! | Backspace | 초안이 비어 있으면 마지막 태그 삭제 |
//!
//! 포커스를 잃을 때(blur) 초안이 남아 있으면 그것도 확정합니다.
//! `,`는 태그 구분자이므로 태그 안에 들어갈 수 없습니다.

use crate::models::is_valid_tag;

/// 위젯이 처리하는 키
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Comma,
    Backspace,
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, Default)]
pub struct TagInput {
    committed: Vec<String>,
    draft: String,
    universe: Vec<String>,
    suggestions: Vec<String>,
    highlighted: Option<usize>,
}

impl TagInput {
    /// # 매개변수
    /// - `committed`: 이미 붙어 있는 태그 (문서 수정 화면 등)
    /// - `universe`: 자동완성 후보 전체 (`GET /api/documents-tags` 결과)
    pub fn new(committed: Vec<String>, universe: Vec<String>) -> Self {
        let mut input = Self {
            committed: Vec::new(),
            universe,
            ..Self::default()
        };
        for tag in committed {
            input.commit(&tag);
        }
        input
    }

    pub fn tags(&self) -> &[String] {
        &self.committed
    }

    pub fn into_tags(self) -> Vec<String> {
        self.committed
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// 초안이 비어 있지 않고 후보가 하나라도 있을 때 드롭다운이 열립니다.
    pub fn suggestions_open(&self) -> bool {
        !self.draft.is_empty() && !self.suggestions.is_empty()
    }

    /// 후보 목록을 바꿉니다. 태그 목록을 새로 받아 왔을 때 씁니다.
    pub fn set_universe(&mut self, universe: Vec<String>) {
        self.universe = universe;
        self.refresh_suggestions();
    }

    /// 입력란 내용이 바뀌었을 때
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
        self.refresh_suggestions();
    }

    /// 키 입력을 처리합니다.
    ///
    /// # 반환값
    /// 위젯이 처리했으면 `true` (브라우저 기본 동작을 막아야 함).
    /// 빈 초안에서 Enter/Tab/`,`는 처리하지 않습니다.
    pub fn key_down(&mut self, key: Key) -> bool {
        match key {
            Key::Enter | Key::Tab | Key::Comma => {
                if let Some(tag) = self.highlighted_suggestion() {
                    self.commit(&tag);
                    true
                } else if !self.draft.trim().is_empty() {
                    let draft = self.draft.clone();
                    self.commit(&draft);
                    true
                } else {
                    false
                }
            }
            Key::ArrowDown => {
                let last = match self.suggestions.len().checked_sub(1) {
                    Some(last) => last,
                    None => return false,
                };
                self.highlighted = Some(match self.highlighted {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                });
                true
            }
            Key::ArrowUp => {
                if self.suggestions.is_empty() {
                    return false;
                }
                self.highlighted = Some(self.highlighted.map_or(0, |i| i.saturating_sub(1)));
                true
            }
            Key::Backspace => {
                if !self.draft.is_empty() || self.committed.is_empty() {
                    return false;
                }
                self.committed.pop();
                self.refresh_suggestions();
                true
            }
        }
    }

    /// 포커스를 잃었을 때. 남은 초안을 확정합니다.
    pub fn blur(&mut self) {
        if !self.draft.trim().is_empty() {
            let draft = self.draft.clone();
            self.commit(&draft);
        }
    }

    /// 드롭다운에서 후보를 눌렀을 때. 강조 여부와 상관없이 그 후보를 확정합니다.
    pub fn pick(&mut self, index: usize) {
        if let Some(tag) = self.suggestions.get(index).cloned() {
            self.commit(&tag);
        }
    }

    /// 칩의 삭제 버튼
    pub fn remove(&mut self, tag: &str) {
        self.committed.retain(|t| t != tag);
        self.refresh_suggestions();
    }

    /// 태그를 확정하고 초안을 비웁니다.
    ///
    /// 공백만 있거나, `,`가 들어 있거나, 이미 있는 태그는 추가하지 않습니다.
    /// 초안은 어느 경우든 비웁니다.
    pub fn commit(&mut self, tag: &str) {
        let tag = tag.trim();
        if is_valid_tag(tag) && !self.committed.iter().any(|t| t == tag) {
            self.committed.push(tag.to_string());
        }
        self.draft.clear();
        self.refresh_suggestions();
    }

    fn highlighted_suggestion(&self) -> Option<String> {
        if !self.suggestions_open() {
            return None;
        }
        self.highlighted
            .and_then(|i| self.suggestions.get(i))
            .cloned()
    }

    fn refresh_suggestions(&mut self) {
        let needle = self.draft.to_lowercase();
        self.suggestions = self
            .universe
            .iter()
            .filter(|t| is_valid_tag(t))
            .filter(|t| !self.committed.contains(t))
            .filter(|t| t.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        self.highlighted = None;
    }
}
