mod commands;
mod http_routes;
