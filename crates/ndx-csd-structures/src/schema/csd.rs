// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `CSD` type of the `ndx-csd` namespace.

use super::types::{
    AttributeSpec, DatasetSpec, GroupSpec, IncludeSpec, NamespaceSpec, Quantity, SpecDType,
    SpecValue,
};

/// Unit of `data`.
pub const DATA_UNIT: &str = "volts/meters^2";
/// Unit of `time_from_event`.
pub const TIME_UNIT: &str = "seconds";
/// Unit of every `rel_electrode_locations_*` dataset.
pub const LOCATION_UNIT: &str = "meters";

/// Namespace the `CSD` type belongs to.
pub const NAMESPACE_NAME: &str = "ndx-csd";
/// Name of the `CSD` neurodata type.
pub const CSD_TYPE_NAME: &str = "CSD";

/// Field, attribute and dataset names used by the `CSD` type.
pub mod field {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const NUM_TRIALS: &str = "num_trials";
    pub const ACTUAL_ELECTRODES: &str = "actual_electrodes";
    pub const ELECTRODES_REFERENCE_FRAME: &str = "electrodes_reference_frame";
    pub const DATA: &str = "data";
    pub const TIME_FROM_EVENT: &str = "time_from_event";
    pub const EVENT_DESCRIPTION: &str = "event_description";
    pub const REL_ELECTRODE_LOCATIONS_X: &str = "rel_electrode_locations_x";
    pub const REL_ELECTRODE_LOCATIONS_Y: &str = "rel_electrode_locations_y";
    pub const REL_ELECTRODE_LOCATIONS_Z: &str = "rel_electrode_locations_z";
    pub const UNIT: &str = "unit";

    /// Coordinate datasets in axis order (x, y, z).
    pub const REL_ELECTRODE_LOCATIONS: [&str; 3] = [
        REL_ELECTRODE_LOCATIONS_X,
        REL_ELECTRODE_LOCATIONS_Y,
        REL_ELECTRODE_LOCATIONS_Z,
    ];
}

/// Dimension labels shared between `data` and the 1-D datasets indexing its axes.
pub mod dim {
    pub const NUM_TIMES: &str = "num_times";
    pub const NUM_ELECTRODES_X: &str = "num_electrodes_x";
    pub const NUM_ELECTRODES_Y: &str = "num_electrodes_y";
    pub const NUM_ELECTRODES_Z: &str = "num_electrodes_z";
}

const fn unit_attribute(doc: &'static str, unit: &'static str) -> AttributeSpec {
    AttributeSpec {
        name: field::UNIT,
        doc,
        dtype: SpecDType::Text,
        value: Some(SpecValue::Text(unit)),
        default_value: None,
        required: true,
    }
}

const LOCATION_UNIT_ATTRIBUTE: AttributeSpec = unit_attribute(
    "Unit of measurement for coordinate values, which is fixed to 'meters'.",
    LOCATION_UNIT,
);

const CSD_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec {
        name: field::DESCRIPTION,
        doc: "Description of the current source density analysis, including how it was computed.",
        dtype: SpecDType::Text,
        value: None,
        default_value: None,
        required: true,
    },
    AttributeSpec {
        name: field::NUM_TRIALS,
        doc: "Number of trials used to compute the average CSD.",
        dtype: SpecDType::Uint64,
        value: None,
        default_value: None,
        required: true,
    },
    AttributeSpec {
        name: field::ACTUAL_ELECTRODES,
        doc: "Whether the electrode locations provided correspond to actual electrode locations as \
              opposed to virtual electrode locations (where interpolation is used to compute the \
              CSD at the virtual locations).",
        dtype: SpecDType::Bool,
        value: None,
        default_value: Some(SpecValue::Bool(false)),
        required: false,
    },
    AttributeSpec {
        name: field::ELECTRODES_REFERENCE_FRAME,
        doc: "Description of what an electrode location of 0 (or (0,0) or (0,0,0)) represents, \
              e.g., most superior point of a linear probe, or most posterior and most left point \
              of a 2D array. This value should also describe what a positive value in each \
              dimension represents, e.g., +x is superior.",
        dtype: SpecDType::Text,
        value: None,
        default_value: None,
        required: true,
    },
];

const CSD_DATASETS: &[DatasetSpec] = &[
    DatasetSpec {
        name: field::DATA,
        doc: "The average current source density aligned to a particular event, in volts/meters^2.",
        dtype: SpecDType::Float32,
        dims: &[
            &[dim::NUM_TIMES, dim::NUM_ELECTRODES_X],
            &[dim::NUM_TIMES, dim::NUM_ELECTRODES_X, dim::NUM_ELECTRODES_Y],
            &[
                dim::NUM_TIMES,
                dim::NUM_ELECTRODES_X,
                dim::NUM_ELECTRODES_Y,
                dim::NUM_ELECTRODES_Z,
            ],
        ],
        quantity: Quantity::Required,
        attributes: &[unit_attribute(
            "Unit of measurement for data, which is fixed to 'volts/meters^2'.",
            DATA_UNIT,
        )],
    },
    DatasetSpec {
        name: field::TIME_FROM_EVENT,
        doc: "Timestamps representing time from event onset, in seconds.",
        dtype: SpecDType::Float32,
        dims: &[&[dim::NUM_TIMES]],
        quantity: Quantity::Required,
        attributes: &[
            unit_attribute(
                "Unit of measurement for time_from_event, which is fixed to 'seconds'.",
                TIME_UNIT,
            ),
            AttributeSpec {
                name: field::EVENT_DESCRIPTION,
                doc: "Description of what a time value of 0 represents, i.e., what event is the \
                      CSD aligned to.",
                dtype: SpecDType::Text,
                value: None,
                default_value: None,
                required: true,
            },
        ],
    },
    DatasetSpec {
        name: field::REL_ELECTRODE_LOCATIONS_X,
        doc: "X-axis coordinates of CSD, relative to a 'reference_frame', in meters.",
        dtype: SpecDType::Float32,
        dims: &[&[dim::NUM_ELECTRODES_X]],
        quantity: Quantity::Optional,
        attributes: &[LOCATION_UNIT_ATTRIBUTE],
    },
    DatasetSpec {
        name: field::REL_ELECTRODE_LOCATIONS_Y,
        doc: "Y-axis coordinates of CSD, relative to a 'reference_frame', in meters.",
        dtype: SpecDType::Float32,
        dims: &[&[dim::NUM_ELECTRODES_Y]],
        quantity: Quantity::Optional,
        attributes: &[LOCATION_UNIT_ATTRIBUTE],
    },
    DatasetSpec {
        name: field::REL_ELECTRODE_LOCATIONS_Z,
        doc: "Z-axis coordinates of CSD, relative to a 'reference_frame', in meters.",
        dtype: SpecDType::Float32,
        dims: &[&[dim::NUM_ELECTRODES_Z]],
        quantity: Quantity::Optional,
        attributes: &[LOCATION_UNIT_ATTRIBUTE],
    },
];

/// Group spec of the `CSD` type. Single source of truth for validation and mapping.
pub const CSD_GROUP_SPEC: GroupSpec = GroupSpec {
    neurodata_type_def: CSD_TYPE_NAME,
    neurodata_type_inc: "NWBDataInterface",
    doc: "Results of a current source density (CSD) analysis.",
    attributes: CSD_ATTRIBUTES,
    datasets: CSD_DATASETS,
};

/// Namespace metadata of the extension defining `CSD`.
pub const NAMESPACE_SPEC: NamespaceSpec = NamespaceSpec {
    name: NAMESPACE_NAME,
    version: "0.1.0",
    doc: "An NWB extension to add support for storing current source density analysis results",
    authors: &["Ryan Ly"],
    contacts: &["rly@lbl.gov"],
    includes: &[IncludeSpec {
        namespace: "core",
        neurodata_type: "NWBDataInterface",
    }],
};
