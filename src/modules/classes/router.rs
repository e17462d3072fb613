use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_class, delete_class, enroll, get_class, list_classes, list_students,
    partial_update_class, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    // `{id}` is a class code on the enroll route.
    Router::new()
        .route("/classes/", get(list_classes).post(create_class))
        .route(
            "/classes/{id}/",
            get(get_class)
                .put(update_class)
                .patch(partial_update_class)
                .delete(delete_class),
        )
        .route("/classes/{id}/enroll/", post(enroll))
        .route("/classes/{id}/students/", get(list_students))
}
