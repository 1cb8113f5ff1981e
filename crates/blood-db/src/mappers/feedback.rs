//! Feedback entity <-> model mapper

use blood_core::entities::Feedback;

use crate::models::FeedbackModel;

impl From<FeedbackModel> for Feedback {
    fn from(model: FeedbackModel) -> Self {
        Feedback {
            id: model.id,
            name: model.name,
            email: model.email,
            subject: model.subject,
            message: model.message,
            rating: model.rating,
            is_resolved: model.is_resolved,
            admin_response: model.admin_response,
            created_at: model.created_at,
            resolved_at: model.resolved_at,
        }
    }
}
