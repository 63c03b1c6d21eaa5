//! HTTP handlers for the calculator routes.
//!
//! Decoding failures and arithmetic errors become bad requests; the error
//! translation stage renders them.

use std::sync::Arc;

use abacus_core::{RequestContext, ServiceError};
use abacus_middleware::{HandlerResult, Request, Response, ResponseExt};
use abacus_server::request::{decode_json, query_param_i64};
use abacus_store::{Pagination, Record, ResultSource, DEFAULT_PAGE_SIZE};
use http::StatusCode;

use crate::calculator::CalcError;
use crate::dto::{
    AdditionRequest, AdditionResponse, DivisionRequest, DivisionResponse, MultiplicationRequest,
    MultiplicationResponse, RecentResponse, SubtractionRequest, SubtractionResponse,
};
use crate::service::CalculatorService;

impl From<CalcError> for ServiceError {
    fn from(error: CalcError) -> Self {
        ServiceError::bad_request(error.to_string())
    }
}

/// Handlers sharing one service and one result source.
pub struct CalculatorHandlers {
    service: CalculatorService,
    source: Arc<dyn ResultSource>,
}

impl CalculatorHandlers {
    /// Creates the handler set.
    #[must_use]
    pub fn new(service: CalculatorService, source: Arc<dyn ResultSource>) -> Self {
        Self { service, source }
    }

    /// `POST /addition`
    pub async fn addition(self: Arc<Self>, ctx: RequestContext, request: Request) -> HandlerResult {
        let body: AdditionRequest = decode_json(request).await?;
        let record = self.service.add(body.summand_one, body.summand_two)?;
        log_result(&ctx, &record);
        Response::json(StatusCode::OK, &AdditionResponse { sum: record.value() })
    }

    /// `POST /subtraction`
    pub async fn subtraction(self: Arc<Self>, ctx: RequestContext, request: Request) -> HandlerResult {
        let body: SubtractionRequest = decode_json(request).await?;
        let record = self.service.subtract(body.minuend, body.subtrahend)?;
        log_result(&ctx, &record);
        Response::json(
            StatusCode::OK,
            &SubtractionResponse {
                difference: record.value(),
            },
        )
    }

    /// `POST /multiplication`
    pub async fn multiplication(
        self: Arc<Self>,
        ctx: RequestContext,
        request: Request,
    ) -> HandlerResult {
        let body: MultiplicationRequest = decode_json(request).await?;
        let record = self.service.multiply(body.factor_one, body.factor_two)?;
        log_result(&ctx, &record);
        Response::json(
            StatusCode::OK,
            &MultiplicationResponse {
                product: record.value(),
            },
        )
    }

    /// `POST /division`
    pub async fn division(self: Arc<Self>, ctx: RequestContext, request: Request) -> HandlerResult {
        let body: DivisionRequest = decode_json(request).await?;
        let record = self.service.divide(body.dividend, body.divisor)?;
        log_result(&ctx, &record);
        Response::json(
            StatusCode::OK,
            &DivisionResponse {
                quotient: record.value(),
            },
        )
    }

    /// `GET /recent?page=N&page_size=M`
    pub async fn recent(self: Arc<Self>, _ctx: RequestContext, request: Request) -> HandlerResult {
        let pagination = Pagination::new(
            query_param_i64(&request, "page", 1),
            query_param_i64(&request, "page_size", DEFAULT_PAGE_SIZE),
        );

        let page = self.source.query(pagination);
        let response = RecentResponse {
            calculations: page.items.iter().map(|r| r.expression().to_string()).collect(),
            pagination: page.metadata,
        };

        Response::json(StatusCode::OK, &response)
    }
}

fn log_result(ctx: &RequestContext, record: &Record) {
    tracing::debug!(
        trace_id = %ctx.trace_id(),
        expression = record.expression(),
        "calculation recorded"
    );
}

impl std::fmt::Debug for CalculatorHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorHandlers")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
