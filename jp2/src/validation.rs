use crate::box_type::{BoxKind, BoxType, BOX_TYPE_HEADER, BOX_TYPE_RESOLUTION};
use crate::error::StructuralViolation;

/// How many children of one kind a superbox accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// A second child of this kind is refused.
    AtMostOne,

    /// Any number are accepted, only the first is addressable.
    FirstAddressable,

    /// Never a child of this superbox.
    Forbidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildRule {
    pub kind: BoxKind,
    pub cardinality: Cardinality,
}

/// The structural rules of one superbox type.
#[derive(Debug, PartialEq, Eq)]
pub struct ChildRules {
    /// Type of the superbox these rules apply to.
    pub container: BoxType,

    /// Kind that must be added before any other child, if any.
    pub leader: Option<BoxKind>,
    pub rules: &'static [ChildRule],
}

impl ChildRules {
    fn rule(&self, kind: BoxKind) -> Option<&ChildRule> {
        self.rules.iter().find(|rule| rule.kind == kind)
    }

    /// Refuse a child kind this superbox may never hold.
    ///
    /// Needs no state, so a decoder can call it on a child's header before
    /// decoding the child's contents.
    pub fn check_nesting(&self, kind: BoxKind, box_type: BoxType) -> Result<(), StructuralViolation> {
        match self.rule(kind) {
            Some(ChildRule {
                cardinality: Cardinality::Forbidden,
                ..
            }) => Err(StructuralViolation::NotAllowed {
                container: self.container,
                box_type,
            }),
            _ => Ok(()),
        }
    }
}

// The contents of the JP2 Header box shall start with an Image Header box.
// Every other box defined for it may be found anywhere after the Image Header
// box. There may be multiple Colour Specification boxes, but a conforming
// reader uses only the first. A JP2 Header box never holds another one.
pub static HEADER_RULES: ChildRules = ChildRules {
    container: BOX_TYPE_HEADER,
    leader: Some(BoxKind::ImageHeader),
    rules: &[
        ChildRule {
            kind: BoxKind::Header,
            cardinality: Cardinality::Forbidden,
        },
        ChildRule {
            kind: BoxKind::ImageHeader,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::BitsPerComponent,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::ColourSpecification,
            cardinality: Cardinality::FirstAddressable,
        },
        ChildRule {
            kind: BoxKind::Palette,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::ComponentMapping,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::ChannelDefinition,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::Resolution,
            cardinality: Cardinality::AtMostOne,
        },
    ],
};

// A Resolution box holds at most one Capture Resolution box and at most one
// Default Display Resolution box, in any order, and no other superbox.
pub static RESOLUTION_RULES: ChildRules = ChildRules {
    container: BOX_TYPE_RESOLUTION,
    leader: None,
    rules: &[
        ChildRule {
            kind: BoxKind::Header,
            cardinality: Cardinality::Forbidden,
        },
        ChildRule {
            kind: BoxKind::Resolution,
            cardinality: Cardinality::Forbidden,
        },
        ChildRule {
            kind: BoxKind::CaptureResolution,
            cardinality: Cardinality::AtMostOne,
        },
        ChildRule {
            kind: BoxKind::DefaultDisplayResolution,
            cardinality: Cardinality::AtMostOne,
        },
    ],
};

/// Insertion-time enforcement of a [`ChildRules`] table.
///
/// Slots map a kind to the index of the child that occupies it. Checking
/// ([`admit`](ChildValidator::admit)) never mutates, so a refused child leaves
/// the validator and its container untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildValidator {
    rules: &'static ChildRules,
    slots: Vec<(BoxKind, usize)>,
}

impl ChildValidator {
    pub fn new(rules: &'static ChildRules) -> ChildValidator {
        ChildValidator {
            rules,
            slots: vec![],
        }
    }

    /// Decide whether a child may be appended.
    ///
    /// Returns the slot the child will occupy, or `None` when it is accepted
    /// without being addressable.
    pub fn admit(
        &self,
        kind: BoxKind,
        box_type: BoxType,
    ) -> Result<Option<BoxKind>, StructuralViolation> {
        self.rules.check_nesting(kind, box_type)?;

        if let Some(leader) = self.rules.leader {
            if kind != leader && self.slot(leader).is_none() {
                return Err(StructuralViolation::OutOfOrder {
                    expected: leader.box_type().unwrap_or_default(),
                    box_type,
                });
            }
        }

        let rule = match self.rules.rule(kind) {
            Some(rule) => rule,
            None => return Ok(None),
        };

        match (self.slot(kind), rule.cardinality) {
            (_, Cardinality::Forbidden) => Err(StructuralViolation::NotAllowed {
                container: self.rules.container,
                box_type,
            }),
            (None, _) => Ok(Some(kind)),
            (Some(_), Cardinality::AtMostOne) => Err(StructuralViolation::Duplicate { box_type }),
            (Some(_), Cardinality::FirstAddressable) => Ok(None),
        }
    }

    /// Record that the child at `index` occupies the slot for `kind`.
    pub fn occupy(&mut self, kind: BoxKind, index: usize) {
        if self.slot(kind).is_none() {
            self.slots.push((kind, index));
        }
    }

    pub fn slot(&self, kind: BoxKind) -> Option<usize> {
        self.slots
            .iter()
            .find(|(slot_kind, _)| *slot_kind == kind)
            .map(|(_, index)| *index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_type::{
        BOX_TYPE_CAPTURE_RESOLUTION, BOX_TYPE_COLOUR_SPECIFICATION, BOX_TYPE_IMAGE_HEADER,
        BOX_TYPE_PALETTE,
    };

    #[test]
    fn leader_must_come_first() {
        let validator = ChildValidator::new(&HEADER_RULES);
        assert_eq!(
            validator.admit(BoxKind::Palette, BOX_TYPE_PALETTE),
            Err(StructuralViolation::OutOfOrder {
                expected: BOX_TYPE_IMAGE_HEADER,
                box_type: BOX_TYPE_PALETTE,
            })
        );
        assert_eq!(
            validator.admit(BoxKind::Other, BoxType(*b"uuid")),
            Err(StructuralViolation::OutOfOrder {
                expected: BOX_TYPE_IMAGE_HEADER,
                box_type: BoxType(*b"uuid"),
            })
        );
        assert_eq!(
            validator.admit(BoxKind::ImageHeader, BOX_TYPE_IMAGE_HEADER),
            Ok(Some(BoxKind::ImageHeader))
        );
    }

    #[test]
    fn admit_does_not_occupy() {
        let mut validator = ChildValidator::new(&HEADER_RULES);
        validator.occupy(BoxKind::ImageHeader, 0);
        assert!(validator.admit(BoxKind::Palette, BOX_TYPE_PALETTE).is_ok());
        assert!(validator.admit(BoxKind::Palette, BOX_TYPE_PALETTE).is_ok());
        assert_eq!(validator.slot(BoxKind::Palette), None);

        validator.occupy(BoxKind::Palette, 1);
        assert_eq!(
            validator.admit(BoxKind::Palette, BOX_TYPE_PALETTE),
            Err(StructuralViolation::Duplicate {
                box_type: BOX_TYPE_PALETTE
            })
        );
    }

    #[test]
    fn first_colour_specification_keeps_its_slot() {
        let mut validator = ChildValidator::new(&HEADER_RULES);
        validator.occupy(BoxKind::ImageHeader, 0);
        assert_eq!(
            validator.admit(BoxKind::ColourSpecification, BOX_TYPE_COLOUR_SPECIFICATION),
            Ok(Some(BoxKind::ColourSpecification))
        );
        validator.occupy(BoxKind::ColourSpecification, 1);
        assert_eq!(
            validator.admit(BoxKind::ColourSpecification, BOX_TYPE_COLOUR_SPECIFICATION),
            Ok(None)
        );
        validator.occupy(BoxKind::ColourSpecification, 2);
        assert_eq!(validator.slot(BoxKind::ColourSpecification), Some(1));
    }

    #[test]
    fn resolution_rules_have_no_leader() {
        let mut validator = ChildValidator::new(&RESOLUTION_RULES);
        assert_eq!(
            validator.admit(BoxKind::CaptureResolution, BOX_TYPE_CAPTURE_RESOLUTION),
            Ok(Some(BoxKind::CaptureResolution))
        );
        validator.occupy(BoxKind::CaptureResolution, 0);
        assert!(validator
            .admit(BoxKind::CaptureResolution, BOX_TYPE_CAPTURE_RESOLUTION)
            .is_err());
        assert_eq!(validator.admit(BoxKind::Other, BoxType(*b"free")), Ok(None));
    }

    #[test]
    fn superboxes_refuse_nested_superboxes() {
        let mut validator = ChildValidator::new(&HEADER_RULES);
        validator.occupy(BoxKind::ImageHeader, 0);
        assert_eq!(
            validator.admit(BoxKind::Header, BOX_TYPE_HEADER),
            Err(StructuralViolation::NotAllowed {
                container: BOX_TYPE_HEADER,
                box_type: BOX_TYPE_HEADER,
            })
        );
        assert!(HEADER_RULES
            .check_nesting(BoxKind::Resolution, BOX_TYPE_RESOLUTION)
            .is_ok());

        for kind in [BoxKind::Header, BoxKind::Resolution] {
            let box_type = kind.box_type().unwrap();
            assert_eq!(
                RESOLUTION_RULES.check_nesting(kind, box_type),
                Err(StructuralViolation::NotAllowed {
                    container: BOX_TYPE_RESOLUTION,
                    box_type,
                })
            );
        }
    }
}
