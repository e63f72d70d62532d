//! # 목록 필터 상태 머신
//!
//! 문서 목록 화면의 필터는 `(활성 태그 집합, 페이지)` 두 값입니다.
//!
//! ## 규칙
//! - 태그가 바뀌면 페이지는 1로 돌아갑니다.
//! - 상태는 URL 쿼리(`tags=a%2Cb&page=2`)와 항상 같은 값을 나타냅니다.
//!   기본값(태그 없음, 1페이지)은 생략하므로 기본 상태의 쿼리는 빈 문자열입니다.
//! - 서버 응답은 요청을 보낸 시점의 상태(키)와 함께 돌아오며,
//!   키가 현재 상태와 같을 때만 화면에 반영됩니다.
//!
//! ```text
//! dispatch(AddTag("finance"))
//!   → state = {finance}, page 1
//!   → FetchRequest { key, query: "tags=finance" }
//! receive(key, page)  // key == state 이면 반영, 아니면 버림
//! ```

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::models::{is_valid_tag, parse_page, ListQuery, TAG_SEPARATOR};

/// 필터 상태. 태그는 정렬된 집합이라 같은 필터는 항상 같은 값이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    active_tags: BTreeSet<String>,
    page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_tags: BTreeSet::new(),
            page: 1,
        }
    }
}

/// 필터를 바꾸는 사용자 동작
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    AddTag(String),
    RemoveTag(String),
    Clear,
    SetPage(u32),
}

/// URL 쿼리 직렬화용. 기본값인 필드는 생략합니다.
#[derive(Serialize)]
struct UrlQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tags(&self) -> impl Iterator<Item = &str> {
        self.active_tags.iter().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.active_tags.contains(tag)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// 태그를 추가합니다. 이미 있으면 아무것도 바꾸지 않습니다.
    ///
    /// 앞뒤 공백은 잘라내고, 빈 태그와 구분자(`,`)가 들어간 태그는 무시합니다.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !is_valid_tag(tag) || self.active_tags.contains(tag) {
            return;
        }
        self.active_tags.insert(tag.to_string());
        self.page = 1;
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.active_tags.remove(tag);
        self.page = 1;
    }

    pub fn clear(&mut self) {
        self.active_tags.clear();
        self.page = 1;
    }

    /// 페이지만 바꿉니다. 0은 1로 올립니다.
    ///
    /// 마지막 페이지 상한은 알 수 없으므로 호출자가 `Pager`로 맞춥니다.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// 동작을 적용한 새 상태를 돌려줍니다. `self`는 바뀌지 않습니다.
    pub fn apply(&self, action: &FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::AddTag(tag) => next.add_tag(tag),
            FilterAction::RemoveTag(tag) => next.remove_tag(tag),
            FilterAction::Clear => next.clear(),
            FilterAction::SetPage(page) => next.set_page(*page),
        }
        next
    }

    /// 서버 목록 API와 브라우저 URL에 함께 쓰는 쿼리 문자열
    ///
    /// - 기본 상태 → `""`
    /// - `{2024, finance}`, 2페이지 → `"tags=2024%2Cfinance&page=2"`
    pub fn to_query_string(&self) -> String {
        let joined = self
            .active_tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR.to_string().as_str());

        let query = UrlQuery {
            tags: (!joined.is_empty()).then_some(joined.as_str()),
            page: (self.page > 1).then_some(self.page),
        };

        serde_urlencoded::to_string(&query).unwrap_or_default()
    }

    /// URL 쿼리에서 상태를 복원합니다.
    ///
    /// 앞의 `?`는 있어도 되고, 해석할 수 없는 쿼리는 기본 상태가 됩니다.
    /// 태그와 페이지는 서버와 같은 규칙(`parse_tag_list`, `parse_page`)으로 읽습니다.
    pub fn from_query_string(query: &str) -> FilterState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let parsed: ListQuery = serde_urlencoded::from_str(query).unwrap_or_default();

        FilterState {
            active_tags: parsed.tag_list().into_iter().collect(),
            page: parse_page(parsed.page.as_deref()),
        }
    }
}

/// 페이지 이동 버튼 상태
///
/// 첫/마지막 페이지에서 이전/다음은 비활성화되며 순환하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub last: u32,
}

impl Pager {
    pub fn new(current: u32, last: u32) -> Self {
        Self {
            current: current.max(1),
            last: last.max(1),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.last
    }

    /// 이전 페이지 번호. 범위를 벗어난 현재 페이지는 마지막 페이지로 당깁니다.
    pub fn prev(&self) -> Option<u32> {
        self.has_prev().then(|| self.clamp(self.current - 1))
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    /// `[1, last]` 범위로 자릅니다.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.last)
    }
}

/// 목록 요청. `key`는 요청을 만든 시점의 필터 상태입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub key: FilterState,
    pub query: String,
}

/// 필터 상태와 목록 데이터를 함께 관리합니다.
///
/// `T`는 서버 응답 타입(보통 문서 페이지)이며 이 모듈은 내용을 보지 않습니다.
/// 요청 전송은 호출자가 하고, 끝나면 `receive` 또는 `fail`을 부릅니다.
#[derive(Debug)]
pub struct DocumentListing<T> {
    state: FilterState,
    in_flight: HashSet<FilterState>,
    data: Option<T>,
}

impl<T> Default for DocumentListing<T> {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl<T> DocumentListing<T> {
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            in_flight: HashSet::new(),
            data: None,
        }
    }

    /// 페이지 첫 진입 시 URL 쿼리로 시작합니다.
    pub fn from_query_string(query: &str) -> Self {
        Self::new(FilterState::from_query_string(query))
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// 마지막으로 반영된 응답
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// 현재 상태에 대한 요청이 진행 중인지
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(&self.state)
    }

    /// 현재 상태를 나타내는 URL 쿼리
    pub fn url_query(&self) -> String {
        self.state.to_query_string()
    }

    /// 현재 상태로 목록을 요청합니다. 같은 키의 요청이 진행 중이면 `None`.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if !self.in_flight.insert(self.state.clone()) {
            return None;
        }
        Some(FetchRequest {
            key: self.state.clone(),
            query: self.state.to_query_string(),
        })
    }

    /// 동작을 적용하고, 상태가 바뀌었으면 새 요청을 만듭니다.
    pub fn dispatch(&mut self, action: FilterAction) -> Option<FetchRequest> {
        let next = self.state.apply(&action);
        self.transition(next)
    }

    /// 뒤로/앞으로 가기 등으로 URL이 바뀐 경우 상태를 다시 맞춥니다.
    pub fn restore(&mut self, query: &str) -> Option<FetchRequest> {
        self.transition(FilterState::from_query_string(query))
    }

    fn transition(&mut self, next: FilterState) -> Option<FetchRequest> {
        if next == self.state {
            return None;
        }
        self.state = next;
        self.refresh()
    }

    /// 응답을 받습니다.
    ///
    /// # 반환값
    /// - `true`: 키가 현재 상태와 같아 화면에 반영됨
    /// - `false`: 그 사이 필터가 바뀌어 버려짐
    pub fn receive(&mut self, key: &FilterState, response: T) -> bool {
        self.in_flight.remove(key);
        if *key != self.state {
            tracing::debug!(query = %key.to_query_string(), "Dropping stale listing response");
            return false;
        }
        self.data = Some(response);
        true
    }

    /// 요청이 실패했을 때 진행 중 표시를 지웁니다. 이전 데이터는 유지됩니다.
    pub fn fail(&mut self, key: &FilterState) {
        self.in_flight.remove(key);
    }
}
