mod layout_tree_tests;
mod render_info_tests;
mod repair_tests;
