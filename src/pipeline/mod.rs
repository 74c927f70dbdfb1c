pub mod stage1_scan;
pub mod stage2_cache;
pub mod stage3_reduce;
pub mod stage4_report;
