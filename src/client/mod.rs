//! # 클라이언트 상태 모델
//!
//! 브라우저 화면이 들고 있는 상태를 UI와 분리한 순수 상태 머신입니다.
//! - `filter_state`: 목록 화면의 (태그, 페이지) 필터, URL 동기화, 오래된 응답 무시
//! - `tag_input`: 태그 입력 위젯 (자동완성 + 칩 편집)
//!
//! 모든 타입은 `&mut self`로만 바뀌는 평범한 값이며 스레드를 쓰지 않습니다.

pub mod filter_state;
pub mod tag_input;

pub use filter_state::*;
pub use tag_input::*;
