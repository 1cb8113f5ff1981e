//! Feedback service

use blood_core::entities::NewFeedback;
use tracing::{info, instrument};

use crate::dto::{FeedbackRequest, FeedbackResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Public feedback intake
pub struct FeedbackService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedbackService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn submit(&self, request: FeedbackRequest) -> ServiceResult<FeedbackResponse> {
        let feedback = self
            .ctx
            .feedback_repo()
            .create(&NewFeedback::from(request))
            .await?;

        info!(feedback_id = feedback.id, rating = ?feedback.rating, "Feedback received");
        Ok(FeedbackResponse::from(feedback))
    }
}
