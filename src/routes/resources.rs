use axum::{
    Router,
    routing::{MethodRouter, get},
};

use super::route_both;
use crate::{
    AppState,
    handlers::{contact_info, content, home_stats, projects, services, testimonials},
};

/// Resource Router
///
/// Collection and item routes for each entity:
/// - `GET`/`POST` on the collection
/// - `GET`/`PUT`/`PATCH`/`DELETE` on `{id}`
pub fn resource_routes() -> Router<AppState> {
    let resources: [(&str, MethodRouter<AppState>, MethodRouter<AppState>); 6] = [
        (
            "/projects",
            get(projects::list_projects).post(projects::create_project),
            get(projects::get_project)
                .put(projects::update_project)
                .patch(projects::partial_update_project)
                .delete(projects::delete_project),
        ),
        (
            "/testimonials",
            get(testimonials::list_testimonials).post(testimonials::create_testimonial),
            get(testimonials::get_testimonial)
                .put(testimonials::update_testimonial)
                .patch(testimonials::partial_update_testimonial)
                .delete(testimonials::delete_testimonial),
        ),
        (
            "/services",
            get(services::list_services).post(services::create_service),
            get(services::get_service)
                .put(services::update_service)
                .patch(services::partial_update_service)
                .delete(services::delete_service),
        ),
        (
            "/home-stats",
            get(home_stats::list_home_stats).post(home_stats::create_home_stat),
            get(home_stats::get_home_stat)
                .put(home_stats::update_home_stat)
                .patch(home_stats::partial_update_home_stat)
                .delete(home_stats::delete_home_stat),
        ),
        (
            "/content",
            get(content::list_content_sections).post(content::create_content_section),
            get(content::get_content_section)
                .put(content::update_content_section)
                .patch(content::partial_update_content_section)
                .delete(content::delete_content_section),
        ),
        (
            "/contact-info",
            get(contact_info::list_contact_info).post(contact_info::create_contact_info),
            get(contact_info::get_contact_info)
                .put(contact_info::update_contact_info)
                .patch(contact_info::partial_update_contact_info)
                .delete(contact_info::delete_contact_info),
        ),
    ];

    resources
        .into_iter()
        .fold(Router::new(), |router, (base, collection, item)| {
            let router = route_both(router, base, collection);
            route_both(router, &format!("{base}/{{id}}"), item)
        })
}
