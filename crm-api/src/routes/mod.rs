/// API route handlers, one module per resource
///
/// - `health`: Health check (public)
/// - `users`: Login, registration, user management and profile
/// - `admin`: Admin dashboard counts
/// - `customers`, `funding`, `interactions`, `sales`, `communications`:
///   Customer-facing sales work
/// - `projects`, `tasks`, `support_requests`, `update_logs`: Project delivery
/// - `dashboard`, `reports`: Aggregates
///
/// Route groups and their allow-lists are assembled in `app::build_router`.

pub mod admin;
pub mod communications;
pub mod customers;
pub mod dashboard;
pub mod funding;
pub mod health;
pub mod interactions;
pub mod projects;
pub mod reports;
pub mod sales;
pub mod support_requests;
pub mod tasks;
pub mod update_logs;
pub mod users;
