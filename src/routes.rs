use crate::{
    api::{attendance, events, leave, payroll, payslip, permission, shift, users},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let upload_limiter = Arc::new(build_limiter(config.rate_upload_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let default_limiter = Arc::new(build_limiter(config.rate_default_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(default_limiter)
            // attendance pipeline
            .service(
                web::resource("/organize-attendance")
                    .wrap(upload_limiter)
                    .route(web::post().to(attendance::organize_attendance)),
            )
            .service(
                web::resource("/consolidate-attendance")
                    .route(web::post().to(attendance::consolidate_attendance)),
            )
            .service(
                web::resource("/consolidated-attendance-data")
                    .route(web::get().to(attendance::consolidated_attendance_data)),
            )
            // payroll
            .service(
                web::resource("/process-payroll").route(web::post().to(payroll::process_payroll)),
            )
            .service(
                web::resource("/pay-structures")
                    .route(web::get().to(payroll::list_pay_structures))
                    .route(web::post().to(payroll::create_pay_structure)),
            )
            .service(web::resource("/send-payslip").route(web::post().to(payslip::send_payslip)))
            // shifts
            .service(web::resource("/shifts").route(web::get().to(shift::list_shift_options)))
            .service(
                web::resource("/shift-masters")
                    .route(web::get().to(shift::list_shift_masters))
                    .route(web::post().to(shift::create_shift_master)),
            )
            .service(
                web::resource("/shift-mappings")
                    .route(web::get().to(shift::list_shift_mappings))
                    .route(web::post().to(shift::create_shift_mapping)),
            )
            // registration/approval workflow
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(users::register)),
            )
            .service(web::resource("/pending-users").route(web::get().to(users::pending_users)))
            .service(web::resource("/approve-user").route(web::post().to(users::approve_user)))
            .service(web::resource("/reject-user").route(web::post().to(users::reject_user)))
            // leave & permissions
            .service(
                web::resource("/leave-requests")
                    .route(web::get().to(leave::list_leave_requests))
                    .route(web::post().to(leave::create_leave_request)),
            )
            .service(
                web::resource("/leave-requests/{id}")
                    .route(web::put().to(leave::update_leave_status)),
            )
            .service(
                web::resource("/permissions")
                    .route(web::get().to(permission::list_permissions))
                    .route(web::post().to(permission::create_permission)),
            )
            .service(
                web::resource("/permissions/{id}")
                    .route(web::put().to(permission::update_permission_status)),
            )
            // notifications
            .service(web::resource("/events").route(web::get().to(events::event_stream))),
    );
}
