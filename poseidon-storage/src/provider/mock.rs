use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use poseidon_core::{
    scoring, Brief, JournalDetail, JournalPage, JournalRecord, PageParams, PoseidonError,
    PoseidonResult, ScoredResult, SearchParams, SearchResponse, TrendKeyword,
};
use std::sync::Arc;

use super::JournalProvider;
use crate::catalog::Catalog;

const DEFAULT_LIST_LIMIT: usize = 50;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const BRIEF_TREND_COUNT: usize = 3;
const BRIEF_SCOPE_TAG_COUNT: usize = 3;
const HOT_TOPIC_GROWTH: i32 = 40;

/// Provider backed by the static in-binary catalog.
#[derive(Debug, Clone)]
pub struct MockProvider {
    catalog: Arc<Catalog>,
}

impl MockProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl JournalProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_all(&self, params: &PageParams) -> PoseidonResult<JournalPage> {
        let journals = self.catalog.journals();
        let pagination = params.resolve(journals.len(), DEFAULT_LIST_LIMIT);
        Ok(JournalPage {
            data: pagination.apply(journals),
            pagination,
            cached: false,
        })
    }

    async fn fetch_by_id(&self, id: &str) -> PoseidonResult<Option<JournalDetail>> {
        Ok(self.catalog.detail(id))
    }

    async fn search(&self, params: &SearchParams) -> PoseidonResult<SearchResponse> {
        let journals = self.catalog.journals();
        let mut results = match params.query.as_deref() {
            Some(query) => scoring::rank(journals, query),
            None => journals.iter().cloned().map(ScoredResult::unscored).collect(),
        };

        if let Some(filters) = &params.filters {
            results.retain(|r| filters.matches(&r.journal));
        }

        let pagination = params.page().resolve(results.len(), DEFAULT_SEARCH_LIMIT);
        Ok(SearchResponse {
            results: pagination.apply(&results),
            pagination,
            cached: false,
        })
    }

    async fn generate_brief(&self, id: &str, query: Option<&str>) -> PoseidonResult<Brief> {
        let journal = self
            .catalog
            .get(id)
            .ok_or_else(|| PoseidonError::journal_not_found(id))?;
        let trends = self.catalog.trends_for(id);

        Ok(Brief {
            journal_id: id.to_string(),
            journal_name: journal.name.clone(),
            journal_name_ko: journal.name_ko.clone(),
            brief: render_brief(journal, trends, query),
            generated_at: Utc::now().trunc_subsecs(3),
        })
    }
}

/// Korean markdown briefing built from journal metadata and its top trends.
fn render_brief(journal: &JournalRecord, trends: &[TrendKeyword], query: Option<&str>) -> String {
    let top = &trends[..trends.len().min(BRIEF_TREND_COUNT)];
    let hot_topic = top
        .iter()
        .find(|k| k.growth > HOT_TOPIC_GROWTH)
        .or_else(|| top.first());

    let trend_lines = top
        .iter()
        .map(|k| {
            let sign = if k.growth > 0 { "+" } else { "" };
            format!(
                "- **{}** ({}): 빈도 {}%, 성장률 {}{}%",
                k.name, k.name_en, k.frequency, sign, k.growth
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let scope = journal
        .scope_tags
        .iter()
        .take(BRIEF_SCOPE_TAG_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let query_intro = query
        .filter(|q| !q.is_empty())
        .map(|q| format!("귀하의 연구 주제 \"{}\"와 관련하여, ", q))
        .unwrap_or_default();

    let hot_topic_line = hot_topic
        .map(|hot| {
            format!(
                "특히 **{}** 주제가 {}% 성장률을 보이며 급부상하고 있어, 관련 연구 투고 시 좋은 기회가 될 수 있습니다.",
                hot.name, hot.growth
            )
        })
        .unwrap_or_default();

    let mut out = format!("## {} 임무 브리핑\n\n", journal.name_ko);
    out.push_str(&format!(
        "### 저널 개요\n**{}**는 {} 분야의 주요 학술지로, 영향력 지수 {}을 기록하고 있습니다.\n\n",
        journal.name, journal.discipline, journal.impact_factor
    ));
    out.push_str(&format!("### 최근 연구 동향\n{}\n\n", trend_lines));
    out.push_str(&format!(
        "### 적합성 분석\n{}이 저널은 {} 분야의 연구를 적극적으로 게재하고 있습니다.\n\n",
        query_intro, scope
    ));
    out.push_str(&hot_topic_line);
    out.push_str("\n\n### 권장 사항\n");
    out.push_str("- 최신 호의 특집 주제를 확인하세요\n");
    out.push_str("- 저널의 투고 가이드라인을 숙지하세요\n");
    out.push_str("- 유사 논문의 인용 패턴을 분석하세요\n\n");
    out.push_str("---\n*이 브리핑은 POSEIDON 시스템에서 자동 생성되었습니다.*");

    out.trim().to_string()
}
