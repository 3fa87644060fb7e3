use rocket::Route;

mod polls;
pub mod render;

pub fn routes() -> Vec<Route> {
    polls::routes()
}
