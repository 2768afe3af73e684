use std::sync::Arc;

use svgscene_bridge::filter::{self, FilterNodeMap, MutationEvent};
use svgscene_bridge::url::Url;
use svgscene_bridge::{AId, BridgeContext, Document, Error, Options};
use svgscene_tree::filter::{FilterChain, FilterResolution, Kind, TurbulenceKind};
use svgscene_tree::{Filter, PathBuilder, Rect, ShapeNode};

fn shape_node(x: f32, y: f32, w: f32, h: f32) -> ShapeNode {
    let mut node = ShapeNode::new();
    let path = PathBuilder::from_rect(Rect::from_xywh(x, y, w, h).unwrap());
    node.set_shape(Some(Arc::new(path)));
    node
}

fn parse(svg: &str) -> Document {
    Document::from_str(svg, &Options::default()).unwrap()
}

// Resolves filter `f` for a 100x50 rect at the origin.
fn resolve(svg: &str) -> Result<Option<FilterChain>, Error> {
    let doc = parse(svg);
    let opt = Options::default();
    let ctx = BridgeContext::new(&doc, &opt);
    let node = shape_node(0.0, 0.0, 100.0, 50.0);
    let filter = doc.element_by_id("f").unwrap();
    let element = doc.root_element();
    filter::create_filter(&ctx, filter, element, &node)
}

fn assert_rect(r: Rect, x: f32, y: f32, w: f32, h: f32) {
    let eq = |a: f32, b: f32| (a - b).abs() < 0.001;
    assert!(
        eq(r.x(), x) && eq(r.y(), y) && eq(r.width(), w) && eq(r.height(), h),
        "{:?} != ({}, {}, {}, {})",
        r,
        x,
        y,
        w,
        h
    );
}

fn turbulence(attrs: &str) -> Result<svgscene_tree::filter::Turbulence, Error> {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feTurbulence id='t' {}/></filter>
        </svg>",
        attrs
    );
    let doc = parse(&svg);
    let fe = doc.element_by_id("t").unwrap();
    filter::convert_turbulence(fe)
}

#[test]
fn turbulence_defaults() {
    let t = turbulence("").unwrap();
    assert_eq!(t.base_frequency_x.get(), 0.0);
    assert_eq!(t.base_frequency_y.get(), 0.0);
    assert_eq!(t.num_octaves, 1);
    assert_eq!(t.seed, 0);
    assert!(!t.stitch_tiles);
    assert!(!t.is_fractal_noise());
}

#[test]
fn turbulence_single_frequency() {
    let t = turbulence("baseFrequency='0.05'").unwrap();
    assert_eq!(t.base_frequency_x.get(), 0.05);
    assert_eq!(t.base_frequency_y.get(), 0.05);
}

#[test]
fn turbulence_frequency_pair() {
    let t = turbulence("baseFrequency='0.1, 0.2'").unwrap();
    assert_eq!(t.base_frequency_x.get(), 0.1);
    assert_eq!(t.base_frequency_y.get(), 0.2);
}

#[test]
fn turbulence_empty_frequency() {
    let t = turbulence("baseFrequency=''").unwrap();
    assert_eq!(t.base_frequency_x.get(), 0.0);
    assert_eq!(t.base_frequency_y.get(), 0.0);
}

#[test]
fn turbulence_attributes() {
    let t = turbulence("numOctaves='3' seed='2.7' stitchTiles='stitch' type='fractalNoise'").unwrap();
    assert_eq!(t.num_octaves, 3);
    assert_eq!(t.seed, 2);
    assert!(t.stitch_tiles);
    assert_eq!(t.kind, TurbulenceKind::FractalNoise);

    let t = turbulence("stitchTiles='noStitch' type='turbulence'").unwrap();
    assert!(!t.stitch_tiles);
    assert_eq!(t.kind, TurbulenceKind::Turbulence);

    let t = turbulence("stitchTiles=' stitch '").unwrap();
    assert!(t.stitch_tiles);
}

#[test]
fn turbulence_invalid_stitch_tiles() {
    match turbulence("stitchTiles='maybe'") {
        Err(Error::AttributeValue {
            element,
            attribute,
            value,
        }) => {
            assert_eq!(element, "feTurbulence");
            assert_eq!(attribute, AId::StitchTiles);
            assert_eq!(value, "maybe");
        }
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn turbulence_invalid_type() {
    match turbulence("type='noise'") {
        Err(Error::AttributeValue { attribute, .. }) => assert_eq!(attribute, AId::Type),
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn turbulence_invalid_numbers() {
    assert!(turbulence("baseFrequency='-0.1'").is_err());
    assert!(turbulence("baseFrequency='0.1 0.2 0.3'").is_err());
    assert!(turbulence("numOctaves='1.5'").is_err());
    assert!(turbulence("numOctaves='-1'").is_err());
    assert!(turbulence("seed='abc'").is_err());
}

#[test]
fn default_region_in_bbox_units() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feFlood/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_rect(chain.rect(), -10.0, -5.0, 120.0, 60.0);
    assert_rect(chain.output().rect(), -10.0, -5.0, 120.0, 60.0);
    assert_eq!(chain.resolution(), None);
}

#[test]
fn region_in_bbox_units_follows_node() {
    let doc = parse(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' x='0.25' y='0' width='0.5' height='2'><feFlood/></filter>
        </svg>",
    );
    let opt = Options::default();
    let ctx = BridgeContext::new(&doc, &opt);
    let node = shape_node(10.0, 20.0, 40.0, 10.0);
    let filter = doc.element_by_id("f").unwrap();
    let chain = filter::create_filter(&ctx, filter, doc.root_element(), &node)
        .unwrap()
        .unwrap();

    assert_rect(chain.rect(), 20.0, 20.0, 20.0, 20.0);
}

#[test]
fn region_in_user_space() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' filterUnits='userSpaceOnUse' x='0' y='0' width='50' height='50'>
                <feFlood x='10' y='10' width='20' height='100'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_rect(chain.rect(), 0.0, 0.0, 50.0, 50.0);
    assert_rect(chain.output().rect(), 10.0, 10.0, 20.0, 40.0);
}

#[test]
fn primitive_region_in_bbox_units() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' primitiveUnits='objectBoundingBox'>
                <feFlood x='0.5'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_rect(chain.output().rect(), 50.0, -5.0, 60.0, 60.0);
}

#[test]
fn primitive_outside_of_region() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' filterUnits='userSpaceOnUse' x='0' y='0' width='50' height='50'>
                <feFlood x='60' y='60' width='10' height='10'/>
            </filter>
        </svg>",
    )
    .unwrap();

    assert!(chain.is_none());
}

#[test]
fn zero_sized_element() {
    let doc = parse(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feFlood/></filter>
        </svg>",
    );
    let opt = Options::default();
    let ctx = BridgeContext::new(&doc, &opt);
    let filter = doc.element_by_id("f").unwrap();

    let node = ShapeNode::new();
    let chain = filter::create_filter(&ctx, filter, doc.root_element(), &node).unwrap();
    assert!(chain.is_none());
}

#[test]
fn filter_resolution() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' filterRes='10 20'><feFlood/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();
    assert_eq!(chain.resolution(), Some(FilterResolution { x: 10, y: 20 }));

    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' filterRes='0'><feFlood/></filter>
        </svg>",
    )
    .unwrap();
    assert!(chain.is_none());
}

#[test]
fn no_primitives_disables_filter() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'/>
        </svg>",
    )
    .unwrap();

    assert!(chain.is_none());
}

#[test]
fn no_primitives_returns_input() {
    let doc = parse(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'/>
        </svg>",
    );
    let opt = Options::default();
    let ctx = BridgeContext::new(&doc, &opt);
    let node = shape_node(0.0, 0.0, 10.0, 10.0);
    let region = Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
    let source = Filter::new(Kind::SourceGraphic, region);
    let filter = doc.element_by_id("f").unwrap();

    let mut node_map = FilterNodeMap::new();
    let output = filter::build_filter_primitives(
        &ctx,
        filter,
        region,
        doc.root_element(),
        &node,
        &source,
        &mut node_map,
    )
    .unwrap()
    .unwrap();

    assert!(Arc::ptr_eq(&output, &source));
}

#[test]
fn local_primitives_ignore_href() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#g'><feFlood/></filter>
            <filter id='g'><feOffset/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_eq!(chain.output().name(), "feFlood");
}

#[test]
fn local_primitives_ignore_broken_href() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#missing'><feFlood/></filter>
        </svg>",
    )
    .unwrap();

    assert!(chain.is_some());
}

#[test]
fn inherited_primitives() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#g'/>
            <filter id='g' href='#h'/>
            <filter id='h'><feGaussianBlur stdDeviation='2 3'/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::GaussianBlur(ref fe) => {
            assert_eq!(fe.std_dev_x.get(), 2.0);
            assert_eq!(fe.std_dev_y.get(), 3.0);
            assert!(Arc::ptr_eq(&fe.input, chain.source()));
        }
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn inherited_filter_keeps_own_region() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#g'/>
            <filter id='g' filterUnits='userSpaceOnUse' x='0' y='0' width='5' height='5'>
                <feFlood/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_rect(chain.rect(), -10.0, -5.0, 120.0, 60.0);
}

#[test]
fn circular_reference() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#g'/>
            <filter id='g' xlink:href='#f'/>
        </svg>",
    );

    match result {
        Err(Error::CircularReference { href }) => assert_eq!(href, "about:blank#g"),
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn self_reference() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#f'/>
        </svg>",
    );

    assert!(matches!(result, Err(Error::CircularReference { .. })));
}

#[test]
fn missing_reference() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#missing'/>
        </svg>",
    );

    match result {
        Err(Error::MissingReference { href }) => assert_eq!(href, "about:blank#missing"),
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn invalid_reference() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#r'/>
            <rect id='r' width='10' height='10'/>
        </svg>",
    );

    assert!(matches!(result, Err(Error::InvalidReference { .. })));
}

#[test]
fn malformed_reference() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='other.svg#g'/>
        </svg>",
    );

    match result {
        Err(Error::MalformedReference { href, .. }) => assert_eq!(href, "other.svg#g"),
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn external_reference() {
    let opt_a = Options {
        base_url: Some(Url::parse("file:///tmp/a.svg").unwrap()),
        ..Options::default()
    };
    let doc_a = Document::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='b.svg#g'/>
        </svg>",
        &opt_a,
    )
    .unwrap();

    let opt_b = Options {
        base_url: Some(Url::parse("file:///tmp/b.svg").unwrap()),
        ..Options::default()
    };
    let doc_b = Document::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='g'><feFlood flood-color='green'/></filter>
        </svg>",
        &opt_b,
    )
    .unwrap();

    let node = shape_node(0.0, 0.0, 10.0, 10.0);
    let filter = doc_a.element_by_id("f").unwrap();

    let ctx = BridgeContext::new(&doc_a, &opt_a);
    let result = filter::create_filter(&ctx, filter, doc_a.root_element(), &node);
    assert!(matches!(result, Err(Error::MissingReference { .. })));

    let mut ctx = BridgeContext::new(&doc_a, &opt_a);
    ctx.add_document(&doc_b);
    let chain = filter::create_filter(&ctx, filter, doc_a.root_element(), &node)
        .unwrap()
        .unwrap();
    assert_eq!(chain.output().name(), "feFlood");
}

#[test]
fn named_results() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'>
                <feFlood result=' flood '/>
                <feGaussianBlur in='SourceGraphic' stdDeviation='1'/>
                <feOffset in='flood' dx='5'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::Offset(ref fe) => {
            assert_eq!(fe.input.name(), "feFlood");
            assert_eq!(fe.dx, 5.0);
        }
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn last_result_wins() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'>
                <feFlood result='a'/>
                <feGaussianBlur stdDeviation='1' result='a'/>
                <feOffset in='a'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::Offset(ref fe) => assert_eq!(fe.input.name(), "feGaussianBlur"),
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn named_results_across_href() {
    let doc = parse(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <filter id='f' xlink:href='#g'/>
            <filter id='g'>
                <feFlood result='flood'/>
                <feOffset in='flood' result='offset'/>
            </filter>
        </svg>",
    );
    let opt = Options::default();
    let ctx = BridgeContext::new(&doc, &opt);
    let node = shape_node(0.0, 0.0, 10.0, 10.0);
    let region = Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
    let source = Filter::new(Kind::SourceGraphic, region);
    let filter = doc.element_by_id("f").unwrap();

    let mut node_map = FilterNodeMap::new();
    let output = filter::build_filter_primitives(
        &ctx,
        filter,
        region,
        doc.root_element(),
        &node,
        &source,
        &mut node_map,
    )
    .unwrap()
    .unwrap();

    assert!(Arc::ptr_eq(&output, &node_map["offset"]));
    match output.kind() {
        Kind::Offset(ref fe) => assert!(Arc::ptr_eq(&fe.input, &node_map["flood"])),
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn unknown_input_disables_filter() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feOffset in='missing'/></filter>
        </svg>",
    )
    .unwrap();

    assert!(chain.is_none());
}

#[test]
fn source_alpha_input() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feOffset in='SourceAlpha'/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    let names: Vec<_> = chain.operators().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["SourceGraphic", "SourceAlpha", "feOffset"]);
}

#[test]
fn offset_in_bbox_units() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f' primitiveUnits='objectBoundingBox'>
                <feOffset dx='0.1' dy='0.1'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::Offset(ref fe) => {
            assert!((fe.dx - 10.0).abs() < 0.001);
            assert!((fe.dy - 5.0).abs() < 0.001);
        }
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn flood_color_alpha() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'>
                <feFlood flood-color='rgba(255, 0, 0, 0.5)' flood-opacity='0.5'/>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::Flood(ref fe) => {
            assert_eq!(fe.color.red, 255);
            assert_eq!(fe.color.alpha, 255);
            assert!((fe.opacity.get() - 0.25).abs() < 0.01);
        }
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn invalid_flood_color() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feFlood flood-color='nope'/></filter>
        </svg>",
    );

    match result {
        Err(Error::AttributeValue { attribute, .. }) => assert_eq!(attribute, AId::FloodColor),
        v => panic!("unexpected result: {:?}", v),
    }
}

#[test]
fn negative_std_deviation() {
    let result = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feGaussianBlur stdDeviation='-1'/></filter>
        </svg>",
    );

    assert!(matches!(result, Err(Error::AttributeValue { .. })));
}

#[test]
fn merge_inputs() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'>
                <feOffset dx='2' result='shadow'/>
                <feMerge>
                    <feMergeNode in='shadow'/>
                    <feMergeNode in='SourceGraphic'/>
                </feMerge>
            </filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    match chain.output().kind() {
        Kind::Merge(ref fe) => {
            let names: Vec<_> = fe.inputs.iter().map(|f| f.name()).collect();
            assert_eq!(names, ["feOffset", "SourceGraphic"]);
        }
        k => panic!("unexpected kind: {:?}", k),
    }
}

#[test]
fn empty_merge() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feMerge/></filter>
        </svg>",
    )
    .unwrap();

    assert!(chain.is_none());
}

#[test]
fn unknown_primitives_are_ignored() {
    let chain = resolve(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feTile/><feTurbulence/><desc/></filter>
        </svg>",
    )
    .unwrap()
    .unwrap();

    assert_eq!(chain.output().name(), "feTurbulence");
}

#[test]
#[should_panic]
fn update_is_not_supported() {
    let doc = parse(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <filter id='f'><feFlood/></filter>
        </svg>",
    );

    filter::update(&MutationEvent {
        element: doc.element_by_id("f").unwrap(),
        attribute: Some(AId::X),
    });
}
