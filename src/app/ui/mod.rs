mod controls;
mod details;
mod minimap_widget;
mod panels;
