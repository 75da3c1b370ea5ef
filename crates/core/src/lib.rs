//! Label-map utilities for DensePose-style body-part segmentation analysis:
//! IUV loading, label remapping, centroids, IoU scoring and batch IoU
//! summaries.

pub mod shared {
    pub mod constants;
    pub mod label_map;
    pub mod part_vocabulary;
}

pub mod labels {
    pub mod domain {
        pub mod remap;
        pub mod resize;
        pub mod semantic_grouping;
    }
    pub mod infrastructure;
}

pub mod centroids {
    pub mod domain {
        pub mod annotation_canvas;
        pub mod centroid;
        pub mod component_labeller;
    }
    pub mod infrastructure;
}

pub mod scoring {
    pub mod domain {
        pub mod best_remapping;
        pub mod iou;
        pub mod label_assigner;
    }
    pub mod infrastructure;
}

pub mod evaluation {
    pub mod domain {
        pub mod iou_table;
        pub mod overall_iou;
    }
    pub mod infrastructure;
}
