
mod maintenance;
mod room_lifecycle;
